use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{error::AppError, gate, handlers::AppState, metrics};

#[derive(Debug, Serialize)]
pub struct PhoneResponse {
    pub phone: String,
}

/// Handle POST /api/phone
///
/// The body is never read, so its size and shape cannot change the outcome.
pub async fn reveal_phone(State(state): State<AppState>, headers: HeaderMap) -> Response {
    debug!("Phone reveal requested");

    let config = state.config.load();
    match gate::authorize(&headers, &state.limiter, config.contact.phone()).await {
        Ok(phone) => {
            metrics::record_reveal("ok");
            (
                [(header::CACHE_CONTROL, "no-store")],
                Json(PhoneResponse { phone }),
            )
                .into_response()
        }
        Err(err) => {
            metrics::record_reveal(err.kind());
            if matches!(err, AppError::Unavailable) {
                info!("Phone reveal requested but no number is configured");
            }
            err.into_response()
        }
    }
}

/// Every method other than POST on /api/phone
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rate_limit::{Quota, RateLimiter};
    use arc_swap::ArcSwap;
    use axum::{body::to_bytes, http::HeaderValue, http::StatusCode};
    use std::{sync::Arc, time::Duration};

    fn state(phone: Option<&str>) -> AppState {
        let mut cfg = Config::default();
        cfg.contact.phone = phone.map(str::to_string);
        AppState::new(
            Arc::new(ArcSwap::from_pointee(cfg)),
            Arc::new(RateLimiter::in_memory(Quota::new(20, Duration::from_secs(60)))),
        )
    }

    fn same_origin_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("stellarview.example"));
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://stellarview.example"),
        );
        headers
    }

    #[tokio::test]
    async fn test_reveal_sets_no_store() {
        let response = reveal_phone(State(state(Some("19165551234"))), same_origin_headers()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"phone": "19165551234"}));
    }

    #[tokio::test]
    async fn test_reveal_unavailable_without_phone() {
        let response = reveal_phone(State(state(None)), same_origin_headers()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Method Not Allowed"}"#);
    }
}
