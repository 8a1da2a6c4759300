//! HTTP service for mesh upload and print-cost estimation.

use std::sync::Arc;
use std::time::Duration;

use crate::estimate::session::SessionRegistry;

pub mod estimate;
pub mod routes;

/// Remote pricing service endpoint and the bound on how long we wait for it.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub url: String,
    pub timeout: Duration,
}

impl PricingConfig {
    /// Read the pricing endpoint from the environment. Absent URL means
    /// estimation is local-only.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("PRICING_SERVICE_URL").ok()?;
        let timeout_ms = std::env::var("PRICING_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);
        Some(Self {
            url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pricing: Option<PricingConfig>,
    pub client: reqwest::Client,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(pricing: Option<PricingConfig>) -> Self {
        Self {
            pricing,
            client: reqwest::Client::new(),
            sessions: Arc::new(SessionRegistry::default()),
        }
    }
}
