use std::io::{self, Stderr, Stdout, Write};

use weathernow_core::{
    CurrentConditions, DisplaySink,
    presentation::{current_conditions_text, radar_url},
};

/// Display sink for a terminal: status and progress on one stream, results on another.
#[derive(Debug)]
pub struct TerminalDisplay<O, E> {
    out: O,
    err: E,
    loading: bool,
}

impl TerminalDisplay<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalDisplay<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err, loading: false }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn out_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }

    fn err_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.err, "{line}") {
            tracing::debug!(error = %e, "stderr write failed");
        }
    }
}

impl<O: Write, E: Write> DisplaySink for TerminalDisplay<O, E> {
    fn set_status(&mut self, message: &str) {
        if !message.is_empty() {
            self.err_line(message);
        }
    }

    fn set_loading(&mut self, on: bool) {
        if on && !self.loading {
            self.err_line("[loading]");
        }
        self.loading = on;
    }

    fn set_place_label(&mut self, label: &str) {
        self.out_line(&format!("Location: {label}"));
    }

    fn set_current_conditions_text(&mut self, conditions: Option<&CurrentConditions>) {
        self.out_line(&current_conditions_text(conditions));
    }

    fn set_radar_frame(&mut self, latitude: f64, longitude: f64) {
        self.out_line(&format!("Radar: {}", radar_url(latitude, longitude)));
    }
}
