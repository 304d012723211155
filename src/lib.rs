pub mod config;
pub mod contact;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod pricing;
pub mod rate_limit;
pub mod server;
pub mod signals;

pub use logging::init_tracing;
