use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, info, instrument};

use crate::{Config, error::LookupError, http, model::Place};

/// Resolves free text to a single best-match place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> Result<Place, LookupError>;
}

/// Open-Meteo place search. Upstream relevance order is trusted; the first hit wins.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        Ok(Self { url: url.into(), http: http::client(timeout_secs)? })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.geocoding_url.clone(), config.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &str) -> Result<Place, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput);
        }

        // reqwest percent-encodes the query value
        let request = self.http.get(&self.url).query(&[("name", query)]);
        let parsed: SearchResponse = http::get_json(request, "geocoding").await?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| {
                debug!("geocoder returned no results");
                LookupError::NotFound
            })?;

        let place = Place {
            name: first.name,
            country: first.country,
            latitude: first.latitude,
            longitude: first.longitude,
        };
        info!(label = %place.label(), lat = place.latitude, lon = place.longitude, "place resolved");
        Ok(place)
    }
}
