use anyhow::{Context, Result};
use plotters::prelude::*;
use std::{fs, io::ErrorKind, path::PathBuf};

use super::{ChartSurface, LineChart};

/// Draws charts into an SVG file; the file is the chart's lifetime.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), size: (800, 400) }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ChartSurface for SvgSurface {
    fn draw(&mut self, chart: &LineChart) -> Result<()> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let (lo, hi) = chart.value_range().unwrap_or((0.0, 1.0));
        let (lo, hi) = (lo - 2.0, hi + 2.0);
        let last = chart.labels.len().saturating_sub(1).max(1);

        let mut ctx = ChartBuilder::on(&root)
            .margin(16)
            .x_label_area_size(32)
            .y_label_area_size(56)
            .build_cartesian_2d(0usize..last, lo..hi)?;

        let labels = &chart.labels;
        let label_fmt = |i: &usize| labels.get(*i).cloned().unwrap_or_default();
        let mut mesh = ctx.configure_mesh();
        mesh.x_labels(labels.len().max(2)).x_label_formatter(&label_fmt);
        if let Some(title) = &chart.y_title {
            mesh.y_desc(title.as_str());
        }
        mesh.draw()?;

        for series in &chart.series {
            let (r, g, b) = series.style.color;
            let color = RGBColor(r, g, b);
            let points: Vec<(usize, f64)> = series
                .values
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .collect();

            if let Some(alpha) = series.style.fill_alpha {
                ctx.draw_series(AreaSeries::new(points.clone(), lo, &color.mix(alpha)))?;
            }
            ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperMiddle)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()
            .with_context(|| format!("Failed to write chart: {}", self.path.display()))?;
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove chart: {}", self.path.display())),
        }
    }
}
