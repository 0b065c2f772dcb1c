use thiserror::Error;

/// Failures that end a search, detection or forecast action.
///
/// None of these are retried; each one is turned into a single status line.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Search text was empty or whitespace only.
    #[error("empty search text")]
    InvalidInput,

    /// Geocoder returned no matches.
    #[error("no place matches the search text")]
    NotFound,

    /// Geolocation is not available on this host.
    #[error("geolocation is not supported")]
    Unsupported,

    /// Location access was refused, or the location service failed.
    #[error("location permission denied")]
    PermissionDenied,

    /// No position arrived within the configured bound.
    #[error("location request timed out")]
    Timeout,

    /// Network, HTTP status or decoding failure.
    #[error("transport error: {0}")]
    Transport(String),
}

pub const MSG_EMPTY_QUERY: &str = "Please enter a city name.";
pub const MSG_NOT_FOUND: &str = "City not found.";
pub const MSG_SEARCH_FAILED: &str = "Error searching city.";
pub const MSG_UNSUPPORTED: &str = "Geolocation not supported.";
pub const MSG_PERMISSION_DENIED: &str = "Location permission denied.";
pub const MSG_TIMEOUT: &str = "Location request timed out.";
pub const MSG_FORECAST_FAILED: &str = "Error fetching weather.";

/// Which call produced a [`LookupError::Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Detect,
    Forecast,
}

impl LookupError {
    /// Fixed user-visible message for this error.
    pub fn status_message(&self, stage: Stage) -> &'static str {
        match self {
            LookupError::InvalidInput => MSG_EMPTY_QUERY,
            LookupError::NotFound => MSG_NOT_FOUND,
            LookupError::Unsupported => MSG_UNSUPPORTED,
            LookupError::PermissionDenied => MSG_PERMISSION_DENIED,
            LookupError::Timeout => MSG_TIMEOUT,
            LookupError::Transport(_) => match stage {
                Stage::Search => MSG_SEARCH_FAILED,
                // the location service failing is reported like a refusal
                Stage::Detect => MSG_PERMISSION_DENIED,
                Stage::Forecast => MSG_FORECAST_FAILED,
            },
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
