//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use tally_config::{CorsConfig, RateLimitConfig, TallyConfig};
use tally_db::store::{AgroStore, BugStore};

use crate::middleware::rate_limit::RateLimiter;

/// HTTP-level settings taken from [`TallyConfig`] once at startup.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub trust_proxy: bool,
    pub max_body_bytes: usize,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &TallyConfig) -> Self {
        Self {
            cors: config.cors.clone(),
            rate_limit: config.rate_limit.clone(),
            trust_proxy: config.server.trust_proxy,
            max_body_bytes: config.server.max_body_bytes,
        }
    }
}

/// Cloned into every handler and middleware. Everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub bugs: Option<Arc<dyn BugStore>>,
    pub agro: Option<Arc<dyn AgroStore>>,
    pub settings: Arc<HttpSettings>,
    pub limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    /// State with no services wired; add them with [`Self::with_bugs`] and
    /// [`Self::with_agro`].
    #[must_use]
    pub fn new(config: &TallyConfig) -> Self {
        Self {
            bugs: None,
            agro: None,
            settings: Arc::new(HttpSettings::from_config(config)),
            limiter: Arc::new(RateLimiter::default()),
            started_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_bugs(mut self, store: Arc<dyn BugStore>) -> Self {
        self.bugs = Some(store);
        self
    }

    #[must_use]
    pub fn with_agro(mut self, store: Arc<dyn AgroStore>) -> Self {
        self.agro = Some(store);
        self
    }

    #[must_use]
    pub const fn serves_bugs(&self) -> bool {
        self.bugs.is_some()
    }
}
