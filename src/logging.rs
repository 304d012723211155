//! Tracing setup and log-safe rendering of the business phone number

use std::fmt;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `default_level`. `format` is `text` or `json`.
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(default_level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if format == "json" {
        registry
            .with(fmt_layer::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt_layer::layer().with_target(true)).try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: tracing already initialized: {}", e);
    }
}

/// Phone number shown with only its last four digits
///
/// # Example
/// ```
/// use stellarview_site::logging::MaskedPhone;
///
/// assert_eq!(MaskedPhone::new("19165551234").to_string(), "*******1234");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MaskedPhone<'a> {
    inner: &'a str,
}

impl<'a> MaskedPhone<'a> {
    pub fn new(phone: &'a str) -> Self {
        Self { inner: phone }
    }
}

impl<'a> fmt::Display for MaskedPhone<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.inner.chars().count();
        if len <= 4 {
            return write!(f, "***");
        }
        let visible: String = self.inner.chars().skip(len - 4).collect();
        write!(f, "{}{}", "*".repeat(len - 4), visible)
    }
}

/// Mask an optional number for display (`config show`, startup logs)
pub fn mask_phone(phone: Option<&str>) -> String {
    match phone {
        Some(p) => MaskedPhone::new(p).to_string(),
        None => "(not set)".to_string(),
    }
}
