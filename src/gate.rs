//! Phone reveal gate
//!
//! Decides, per request, whether the business phone number may be disclosed:
//! origin heuristic first, then the per-client rate limit, then whether a
//! number is configured at all. None of this is a security boundary; it only
//! keeps casual scrapers from harvesting the number.

use axum::http::{header, HeaderMap};
use std::borrow::Cow;
use tracing::debug;

use crate::error::AppError;
use crate::logging::MaskedPhone;
use crate::rate_limit::RateLimiter;

const SEC_FETCH_SITE: &str = "sec-fetch-site";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN: &str = "unknown";

/// Header value as text; obs-text bytes become U+FFFD instead of erasing the value
fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Cow<'a, str> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .unwrap_or(Cow::Borrowed(""))
}

/// Same-origin heuristic
///
/// Passes when origin or referer contains the host, or when
/// `sec-fetch-site` is absent, `same-origin` or `same-site`. A request
/// without a host header never passes.
pub fn is_same_origin(headers: &HeaderMap) -> bool {
    let host = header_str(headers, header::HOST);
    if host.is_empty() {
        return false;
    }

    let origin = header_str(headers, header::ORIGIN);
    let referer = header_str(headers, header::REFERER);
    let sec_fetch_site = header_str(headers, SEC_FETCH_SITE);

    let origin_ok = origin.contains(host.as_ref()) || referer.contains(host.as_ref());
    let fetch_ok = sec_fetch_site.is_empty()
        || sec_fetch_site == "same-origin"
        || sec_fetch_site == "same-site";

    origin_ok || fetch_ok
}

/// Rate-limit bucket for a request: `<first forwarded IP>:<user agent>`
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, X_FORWARDED_FOR);
    let ip = forwarded
        .split(',')
        .next()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN);

    let user_agent = header_str(headers, header::USER_AGENT);
    let user_agent = match user_agent.as_ref() {
        "" => UNKNOWN,
        ua => ua,
    };

    format!("{}:{}", ip, user_agent)
}

/// Run the gate for one request and return the number to disclose
pub async fn authorize(
    headers: &HeaderMap,
    limiter: &RateLimiter,
    phone: Option<&str>,
) -> Result<String, AppError> {
    if !is_same_origin(headers) {
        debug!("Phone reveal rejected: cross-origin request");
        return Err(AppError::Forbidden);
    }

    let key = client_key(headers);
    if !limiter.check(&key).await {
        debug!(client = %key, "Phone reveal rejected: rate limited");
        return Err(AppError::RateLimited);
    }

    match phone.filter(|p| !p.is_empty()) {
        Some(phone) => {
            debug!(phone = %MaskedPhone::new(phone), "Phone revealed");
            Ok(phone.to_string())
        }
        None => Err(AppError::Unavailable),
    }
}
