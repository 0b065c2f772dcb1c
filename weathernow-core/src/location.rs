//! Device position lookup.
//!
//! A terminal has no browser geolocation, so the position is approximated
//! from the public IP address. Configuration decides whether the capability
//! exists at all and whether the user allows it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{info, instrument, warn};

use crate::{config::GeolocationConfig, error::LookupError, http, model::CoordinateQuery};

/// Label used for coordinates obtained from the device.
pub const DETECTED_LABEL: &str = "Your location";

/// Raw position from the platform, before the detection bound is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    /// `false` when the host has no geolocation capability.
    fn is_supported(&self) -> bool;

    async fn current_position(&self) -> Result<Position, LookupError>;
}

/// Bounds a [`PositionSource`] and labels the result.
#[derive(Debug)]
pub struct Geolocator<P> {
    source: P,
    timeout: Duration,
}

#[async_trait]
impl<T: PositionSource + ?Sized> PositionSource for Box<T> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    async fn current_position(&self) -> Result<Position, LookupError> {
        (**self).current_position().await
    }
}

impl<P: PositionSource> Geolocator<P> {
    pub fn new(source: P, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_supported()
    }

    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    pub async fn detect(&self) -> Result<CoordinateQuery, LookupError> {
        if !self.source.is_supported() {
            return Err(LookupError::Unsupported);
        }

        let position = tokio::time::timeout(self.timeout, self.source.current_position())
            .await
            .map_err(|_| {
                warn!("no position within the bound");
                LookupError::Timeout
            })?
            .map_err(|e| match e {
                LookupError::Transport(msg) => {
                    warn!(error = %msg, "location service failed");
                    LookupError::PermissionDenied
                }
                other => other,
            })?;

        info!(lat = position.latitude, lon = position.longitude, "position detected");
        Ok(CoordinateQuery {
            latitude: position.latitude,
            longitude: position.longitude,
            label: DETECTED_LABEL.to_string(),
        })
    }
}

impl Geolocator<Box<dyn PositionSource>> {
    pub fn from_config(config: &GeolocationConfig) -> anyhow::Result<Self> {
        let source: Box<dyn PositionSource> = Box::new(IpPositionSource::from_config(config)?);
        Ok(Self::new(source, Duration::from_secs(config.timeout_secs)))
    }
}

/// Position from an ip-api.com style endpoint.
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    url: String,
    enabled: bool,
    allowed: bool,
    http: Client,
}

impl IpPositionSource {
    pub fn from_config(config: &GeolocationConfig) -> anyhow::Result<Self> {
        // the outer bound is the detection timeout; the client gets some slack on top
        let http = http::client(config.timeout_secs + 5)?;
        Ok(Self { url: config.url.clone(), enabled: config.enabled, allowed: config.allowed, http })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[async_trait]
impl PositionSource for IpPositionSource {
    fn is_supported(&self) -> bool {
        self.enabled
    }

    async fn current_position(&self) -> Result<Position, LookupError> {
        if !self.allowed {
            return Err(LookupError::PermissionDenied);
        }

        let parsed: IpApiResponse = http::get_json(self.http.get(&self.url), "geolocation").await?;

        match (parsed.status.as_str(), parsed.lat, parsed.lon) {
            ("success", Some(latitude), Some(longitude)) => Ok(Position { latitude, longitude }),
            _ => Err(LookupError::Transport(format!(
                "geolocation lookup failed: {}",
                parsed.message.unwrap_or(parsed.status)
            ))),
        }
    }
}
