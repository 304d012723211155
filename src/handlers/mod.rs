pub mod health;
pub mod metrics_handler;
pub mod phone;
pub mod pricing;

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::RateLimiter;

/// State shared by the site's API handlers
#[derive(Clone)]
pub struct AppState {
    /// Swapped wholesale on SIGHUP
    pub config: Arc<ArcSwap<Config>>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Arc<ArcSwap<Config>>, limiter: Arc<RateLimiter>) -> Self {
        Self { config, limiter }
    }
}
