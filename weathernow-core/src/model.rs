use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Best geocoding match for a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// Display label, `name` or `name, country`.
    pub fn label(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Coordinates plus the label shown for them, whichever way they were obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl From<Place> for CoordinateQuery {
    fn from(place: Place) -> Self {
        let label = place.label();
        Self { latitude: place.latitude, longitude: place.longitude, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
}

/// Index-aligned daily forecast values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// ISO dates as returned upstream, e.g. `2024-01-01`.
    pub dates: Vec<String>,
    pub temp_max: Vec<f64>,
    pub temp_min: Vec<f64>,
    /// Only present when the response carried it.
    pub precipitation_sum: Option<Vec<f64>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Short month + day labels ("Jan 1"), falling back to the raw string.
    pub fn date_labels(&self) -> Vec<String> {
        self.dates.iter().map(|raw| date_label(raw)).collect()
    }
}

fn date_label(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Result of one forecast call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub current: Option<CurrentConditions>,
    pub daily: Option<DailySeries>,
}
