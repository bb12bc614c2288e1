//! Application state shared across handlers.

use std::sync::Arc;

use naqlah_core::auth::OtpPolicy;

use crate::config::WebConfig;
use crate::geo::{GeoClient, GeoError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the geocoding client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    geo: GeoClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for geocoding cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, GeoError> {
        let geo = GeoClient::new(&config.geo)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, geo }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the geocoding/routing client.
    #[must_use]
    pub fn geo(&self) -> &GeoClient {
        &self.inner.geo
    }

    /// Which OTP codes the mock verifier accepts.
    #[must_use]
    pub fn otp_policy(&self) -> &OtpPolicy {
        &self.inner.config.otp_policy
    }
}
