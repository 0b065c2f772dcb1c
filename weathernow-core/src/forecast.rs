use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    error::LookupError,
    http,
    model::{CurrentConditions, DailySeries, ForecastReport},
};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Fetches current conditions and a daily series for a coordinate pair.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastReport, LookupError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    url: String,
    forecast_days: u8,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(url: impl Into<String>, forecast_days: u8, timeout_secs: u64) -> anyhow::Result<Self> {
        Ok(Self { url: url.into(), forecast_days, http: http::client(timeout_secs)? })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.forecast_url.clone(), config.forecast_days, config.timeout_secs)
    }

    fn query(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("timezone", "auto".to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("wind_speed_unit", "ms".to_string()),
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    current_weather: Option<OmCurrent>,
    #[serde(default)]
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature: f64,
    windspeed: f64,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Option<Vec<String>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Option<Vec<Option<f64>>>,
}

impl OmDaily {
    /// `None` when the response has no `time` axis.
    fn into_series(self) -> Option<DailySeries> {
        let dates = self.time?;
        let n = dates.len();

        if self.temperature_2m_max.len() != n || self.temperature_2m_min.len() != n {
            warn!(
                days = n,
                max = self.temperature_2m_max.len(),
                min = self.temperature_2m_min.len(),
                "daily series lengths differ; truncating to the shortest"
            );
        }
        let n = n.min(self.temperature_2m_max.len()).min(self.temperature_2m_min.len());

        // Open-Meteo uses null for missing values; charts need numbers
        let fill = |v: Vec<Option<f64>>| -> Vec<f64> {
            v.into_iter().take(n).map(|x| x.unwrap_or(f64::NAN)).collect()
        };

        Some(DailySeries {
            dates: dates.into_iter().take(n).collect(),
            temp_max: fill(self.temperature_2m_max),
            temp_min: fill(self.temperature_2m_min),
            precipitation_sum: self.precipitation_sum.map(fill),
        })
    }
}

impl From<OmResponse> for ForecastReport {
    fn from(res: OmResponse) -> Self {
        ForecastReport {
            current: res.current_weather.map(|c| CurrentConditions {
                temperature_c: c.temperature,
                wind_speed_mps: c.windspeed,
            }),
            daily: res.daily.and_then(OmDaily::into_series),
        }
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoForecast {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastReport, LookupError> {
        let request = self.http.get(&self.url).query(&self.query(latitude, longitude));
        let parsed: OmResponse = http::get_json(request, "forecast").await?;

        let report = ForecastReport::from(parsed);
        debug!(
            has_current = report.current.is_some(),
            days = report.daily.as_ref().map_or(0, DailySeries::len),
            "forecast decoded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> ForecastReport {
        let parsed: OmResponse = serde_json::from_str(json).expect("json");
        parsed.into()
    }

    #[test]
    fn current_weather_is_optional() {
        let report = decode(
            r#"{"daily":{"time":["2024-01-01"],"temperature_2m_max":[1.5],"temperature_2m_min":[-2.0]}}"#,
        );
        assert!(report.current.is_none());
        let daily = report.daily.expect("daily present");
        assert_eq!(daily.temp_max, vec![1.5]);
        assert!(daily.precipitation_sum.is_none());
    }

    #[test]
    fn daily_without_time_is_absent() {
        let report = decode(r#"{"current_weather":{"temperature":3.0,"windspeed":1.0},"daily":{}}"#);
        assert_eq!(
            report.current,
            Some(CurrentConditions { temperature_c: 3.0, wind_speed_mps: 1.0 })
        );
        assert!(report.daily.is_none());
    }

    #[test]
    fn mismatched_lengths_are_truncated() {
        let report = decode(
            r#"{"daily":{"time":["2024-01-01","2024-01-02","2024-01-03"],
                "temperature_2m_max":[1,2],"temperature_2m_min":[0,1,2],
                "precipitation_sum":[0.1,null,0.3]}}"#,
        );
        let daily = report.daily.expect("daily");
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.temp_min, vec![0.0, 1.0]);
        let precip = daily.precipitation_sum.expect("precip");
        assert_eq!(precip.len(), 2);
        assert!(precip[1].is_nan());
    }

    #[test]
    fn query_carries_fixed_and_per_call_params() {
        let client = OpenMeteoForecast::new("http://localhost/forecast", 10, 5).expect("client");
        let q = client.query(52.52, 13.41);
        let get = |k: &str| q.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("timezone"), Some("auto"));
        assert_eq!(get("forecast_days"), Some("10"));
        assert_eq!(get("daily"), Some(DAILY_FIELDS));
        assert_eq!(get("current_weather"), Some("true"));
        assert_eq!(get("wind_speed_unit"), Some("ms"));
        assert_eq!(get("latitude"), Some("52.52"));
        assert_eq!(get("longitude"), Some("13.41"));
    }
}
