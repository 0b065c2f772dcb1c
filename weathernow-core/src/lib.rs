//! Core library for the `weathernow` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding, forecast and device-position clients
//! - The display sink and the single-slot chart renderer
//! - The orchestrator tying a search or detection to a forecast update
//!
//! It is used by `weathernow-cli`, but can also be reused by other front ends.

pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
mod http;
pub mod location;
pub mod model;
pub mod presentation;

pub use app::WeatherApp;
pub use chart::{ChartRenderer, ChartSurface, LineChart, SvgSurface};
pub use config::{Config, GeolocationConfig};
pub use error::{LookupError, Stage};
pub use forecast::{ForecastClient, OpenMeteoForecast};
pub use geocode::{Geocoder, OpenMeteoGeocoder};
pub use location::{Geolocator, IpPositionSource, Position, PositionSource};
pub use model::{CoordinateQuery, CurrentConditions, DailySeries, ForecastReport, Place};
pub use presentation::DisplaySink;
