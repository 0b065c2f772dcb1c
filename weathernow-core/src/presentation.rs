use crate::model::CurrentConditions;

pub const MSG_SEARCHING: &str = "Searching...";
pub const MSG_DETECTING: &str = "Detecting location...";
pub const MSG_FETCHING: &str = "Fetching weather...";
pub const MSG_NO_CURRENT: &str = "No current data";

const RADAR_BASE: &str = "https://embed.windy.com/embed2.html";

/// Side-effecting display sink written to by the orchestrator.
pub trait DisplaySink {
    /// Replaces the status line; an empty message clears it.
    fn set_status(&mut self, message: &str);

    fn set_loading(&mut self, on: bool);

    fn set_place_label(&mut self, label: &str);

    /// Renders the summary, usually through [`current_conditions_text`].
    fn set_current_conditions_text(&mut self, conditions: Option<&CurrentConditions>);

    /// Points the radar viewer at the coordinates, see [`radar_url`].
    fn set_radar_frame(&mut self, latitude: f64, longitude: f64);
}

pub fn current_conditions_text(conditions: Option<&CurrentConditions>) -> String {
    match conditions {
        Some(c) => format!("Current: {}°C, wind {} m/s", c.temperature_c, c.wind_speed_mps),
        None => MSG_NO_CURRENT.to_string(),
    }
}

pub fn radar_url(latitude: f64, longitude: f64) -> String {
    format!("{RADAR_BASE}?lat={latitude}&lon={longitude}&zoom=6&level=surface&overlay=rain")
}
