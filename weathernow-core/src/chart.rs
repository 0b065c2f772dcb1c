use anyhow::Result;
use std::fmt::Debug;
use tracing::debug;

pub mod svg;

pub use svg::SvgSurface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: (u8, u8, u8),
    /// Area fill opacity under the line; `None` draws the line only.
    pub fill_alpha: Option<f64>,
}

pub const MAX_STYLE: SeriesStyle = SeriesStyle { color: (0xff, 0x7a, 0x18), fill_alpha: Some(0.08) };
pub const MIN_STYLE: SeriesStyle = SeriesStyle { color: (0xff, 0xb1, 0x99), fill_alpha: Some(0.06) };

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// A line chart whose series share one label axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub y_title: Option<String>,
}

impl LineChart {
    /// Max/min temperature chart. Values past the shortest input are dropped.
    pub fn forecast(labels: &[String], tmax: &[f64], tmin: &[f64]) -> Self {
        let n = labels.len().min(tmax.len()).min(tmin.len());
        Self {
            labels: labels[..n].to_vec(),
            series: vec![
                Series { label: "Max °C".into(), values: tmax[..n].to_vec(), style: MAX_STYLE },
                Series { label: "Min °C".into(), values: tmin[..n].to_vec(), style: MIN_STYLE },
            ],
            y_title: Some("Temperature (°C)".into()),
        }
    }

    /// Demo chart shown before the first lookup.
    pub fn placeholder() -> Self {
        Self {
            labels: vec!["Day 1".into(), "Day 2".into(), "Day 3".into()],
            series: vec![Series {
                label: "Max °C".into(),
                values: vec![28.0, 30.0, 27.0],
                style: SeriesStyle { fill_alpha: None, ..MAX_STYLE },
            }],
            y_title: None,
        }
    }

    /// `(label, value)` points of one series, in order.
    pub fn points(&self, series: usize) -> Vec<(&str, f64)> {
        self.series
            .get(series)
            .map(|s| self.labels.iter().map(String::as_str).zip(s.values.iter().copied()).collect())
            .unwrap_or_default()
    }

    /// Smallest and largest finite value across all series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Drawing target for at most one chart at a time.
pub trait ChartSurface: Debug {
    fn draw(&mut self, chart: &LineChart) -> Result<()>;

    /// Releases whatever the last `draw` produced.
    fn dispose(&mut self) -> Result<()>;
}

/// Owns the single live chart for a surface.
#[derive(Debug)]
pub struct ChartRenderer<S> {
    surface: S,
    live: Option<LineChart>,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, live: None }
    }

    pub fn render(&mut self, labels: &[String], tmax: &[f64], tmin: &[f64]) -> Result<()> {
        self.replace(LineChart::forecast(labels, tmax, tmin))
    }

    pub fn render_placeholder(&mut self) -> Result<()> {
        self.replace(LineChart::placeholder())
    }

    /// Disposes the previous chart before drawing the next one.
    pub fn replace(&mut self, chart: LineChart) -> Result<()> {
        if self.live.is_some() {
            // keep the slot occupied until the surface has actually let go
            self.surface.dispose()?;
            self.live = None;
        }
        debug!(labels = chart.labels.len(), series = chart.series.len(), "drawing chart");
        self.surface.draw(&chart)?;
        self.live = Some(chart);
        Ok(())
    }

    pub fn current(&self) -> Option<&LineChart> {
        self.live.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
