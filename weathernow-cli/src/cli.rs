use std::{
    io::{Stderr, Stdout},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use weathernow_core::{
    Config, Geolocator, OpenMeteoForecast, OpenMeteoGeocoder, SvgSurface, WeatherApp,
};

use crate::terminal::TerminalDisplay;

type TerminalApp = WeatherApp<TerminalDisplay<Stdout, Stderr>, SvgSurface>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather and a 10-day forecast chart")]
pub struct Cli {
    /// Write the forecast chart here instead of the configured path.
    #[arg(long, global = true)]
    pub chart: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a city by name and show its weather.
    Search {
        /// City name; several words are joined with spaces.
        #[arg(num_args = 0..)]
        city: Vec<String>,
    },

    /// Show weather for the detected device location.
    Detect,

    /// Edit endpoints, geolocation and chart settings interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Search { city } => {
                let mut app = build_app(&with_chart_override(config, self.chart))?;
                app.start()?;
                if let Err(err) = app.search_city(&city.join(" ")).await {
                    tracing::debug!(error = %err, "search ended without weather");
                }
                print_chart_location(&app);
            }
            Command::Detect => {
                let mut app = build_app(&with_chart_override(config, self.chart))?;
                app.start()?;
                if let Err(err) = app.detect_location().await {
                    tracing::debug!(error = %err, "detection ended without weather");
                }
                print_chart_location(&app);
            }
        }

        Ok(())
    }
}

/// `--chart` applies to this run only and never reaches the saved config.
fn with_chart_override(mut config: Config, chart: Option<PathBuf>) -> Config {
    if let Some(path) = chart {
        config.chart_path = path;
    }
    config
}

fn build_app(config: &Config) -> anyhow::Result<TerminalApp> {
    let geocoder = OpenMeteoGeocoder::from_config(config).context("Failed to build geocoder")?;
    let forecast = OpenMeteoForecast::from_config(config).context("Failed to build forecast client")?;
    let geolocator =
        Geolocator::from_config(&config.geolocation).context("Failed to build geolocator")?;

    Ok(WeatherApp::new(
        Box::new(geocoder),
        Box::new(forecast),
        geolocator,
        TerminalDisplay::stdio(),
        SvgSurface::new(config.chart_path.clone()),
    ))
}

fn print_chart_location(app: &TerminalApp) {
    if app.chart().current().is_some() {
        println!("Chart: {}", app.chart().surface().path().display());
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    config.forecast_days = CustomType::<u8>::new("Forecast days (1-16):")
        .with_default(config.forecast_days)
        .prompt()?;

    let chart = Text::new("Chart output path:")
        .with_default(&config.chart_path.display().to_string())
        .prompt()?;
    config.chart_path = PathBuf::from(chart);

    config.geolocation.enabled = Confirm::new("Enable location detection?")
        .with_default(config.geolocation.enabled)
        .prompt()?;

    if config.geolocation.enabled {
        config.geolocation.allowed = Confirm::new("Allow looking up your location from your IP address?")
            .with_default(config.geolocation.allowed)
            .prompt()?;
    }

    config.validate()?;
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
