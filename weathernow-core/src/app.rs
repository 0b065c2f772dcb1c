use tracing::{debug, info, warn};

use crate::{
    chart::{ChartRenderer, ChartSurface},
    error::{LookupError, MSG_EMPTY_QUERY, MSG_FORECAST_FAILED, MSG_UNSUPPORTED, Stage},
    forecast::ForecastClient,
    geocode::Geocoder,
    location::{Geolocator, PositionSource},
    model::CoordinateQuery,
    presentation::{DisplaySink, MSG_DETECTING, MSG_FETCHING, MSG_SEARCHING},
};

/// Drives search/detect → forecast → display.
///
/// Every method takes `&mut self`, so one flow finishes before the next starts
/// and a stale forecast can never overwrite a newer one.
pub struct WeatherApp<D, S> {
    geocoder: Box<dyn Geocoder>,
    forecast: Box<dyn ForecastClient>,
    geolocator: Geolocator<Box<dyn PositionSource>>,
    display: D,
    chart: ChartRenderer<S>,
}

impl<D: DisplaySink, S: ChartSurface> WeatherApp<D, S> {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        forecast: Box<dyn ForecastClient>,
        geolocator: Geolocator<Box<dyn PositionSource>>,
        display: D,
        surface: S,
    ) -> Self {
        Self { geocoder, forecast, geolocator, display, chart: ChartRenderer::new(surface) }
    }

    /// First-load state: the demo chart.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.chart.render_placeholder()
    }

    pub async fn search_city(&mut self, input: &str) -> Result<(), LookupError> {
        let query = input.trim();
        if query.is_empty() {
            self.display.set_status(MSG_EMPTY_QUERY);
            return Err(LookupError::InvalidInput);
        }

        self.display.set_status(MSG_SEARCHING);
        self.display.set_loading(true);

        match self.geocoder.resolve(query).await {
            Ok(place) => self.update_all(place.into()).await,
            Err(err) => {
                debug!(error = %err, "search failed");
                self.display.set_status(err.status_message(Stage::Search));
                self.display.set_loading(false);
                Err(err)
            }
        }
    }

    pub async fn detect_location(&mut self) -> Result<(), LookupError> {
        if !self.geolocator.is_supported() {
            self.display.set_status(MSG_UNSUPPORTED);
            return Err(LookupError::Unsupported);
        }

        self.display.set_status(MSG_DETECTING);
        self.display.set_loading(true);

        match self.geolocator.detect().await {
            Ok(query) => self.update_all(query).await,
            Err(err) => {
                debug!(error = %err, "detection failed");
                self.display.set_status(err.status_message(Stage::Detect));
                self.display.set_loading(false);
                Err(err)
            }
        }
    }

    pub async fn update_all(&mut self, query: CoordinateQuery) -> Result<(), LookupError> {
        self.display.set_status(MSG_FETCHING);
        self.display.set_loading(true);
        // radar does not wait for the forecast
        self.display.set_radar_frame(query.latitude, query.longitude);

        let report = match self.forecast.fetch(query.latitude, query.longitude).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, label = %query.label, "forecast failed");
                self.display.set_loading(false);
                self.display.set_status(err.status_message(Stage::Forecast));
                return Err(err);
            }
        };

        self.display.set_loading(false);
        self.display.set_status("");
        self.display.set_place_label(&query.label);
        self.display.set_current_conditions_text(report.current.as_ref());

        if let Some(daily) = &report.daily {
            let labels = daily.date_labels();
            if let Err(err) = self.chart.render(&labels, &daily.temp_max, &daily.temp_min) {
                warn!(error = %err, "chart render failed");
                self.display.set_status(MSG_FORECAST_FAILED);
                return Ok(());
            }
        }

        info!(label = %query.label, "weather updated");
        Ok(())
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn chart(&self) -> &ChartRenderer<S> {
        &self.chart
    }
}
