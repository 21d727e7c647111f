//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::{CaseSinkPort, GeocoderPort};
use crate::application::services::{CaptureSettings, IntakeService};
use crate::infrastructure::case_sink::{HttpCaseSink, InMemoryCaseSink};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::nominatim::NominatimClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub intake_service: IntakeService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        // Initialize geocoder client
        let geocoder: Arc<dyn GeocoderPort> = Arc::new(NominatimClient::new(
            &config.geocoder_base_url,
            &config.geocoder_user_agent,
            &config.geocoder_language,
            config.geocode_timeout,
        )?);

        // Initialize case sink
        let sink: Arc<dyn CaseSinkPort> = match &config.case_sink_url {
            Some(url) => Arc::new(HttpCaseSink::new(url, config.case_sink_timeout)?),
            None => {
                tracing::warn!("CASE_SINK_URL not set, submissions are kept in memory");
                Arc::new(InMemoryCaseSink::new())
            }
        };

        let capture_settings = CaptureSettings {
            fix_timeout: config.location_fix_timeout,
            geocode_timeout: config.geocode_timeout,
        };

        Ok(Self {
            intake_service: IntakeService::new(geocoder, sink, capture_settings),
            config,
        })
    }
}
