/// Integration tests for the pricing and estimate endpoints
use arc_swap::ArcSwap;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use stellarview_site::{
    config::Config,
    handlers::AppState,
    pricing::PricingTable,
    rate_limit::{Quota, RateLimiter},
    server::create_router,
};
use tower::ServiceExt;

fn app_with(config: Config) -> Router {
    let limiter = Arc::new(RateLimiter::in_memory(Quota::from(&config.rate_limit)));
    let state = AppState::new(Arc::new(ArcSwap::from_pointee(config.clone())), limiter);
    create_router(state, &config, None)
}

async fn post_estimate(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/api/estimate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_pricing_table_served() {
    let response = app_with(Config::default())
        .oneshot(Request::get("/api/pricing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let table: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(table["currency"], "USD");
    assert_eq!(table["minimumCharge"], 40);
    assert_eq!(table["rates"]["residential"]["inOut"]["slider"], 16);
    assert_eq!(table["rates"]["commercial"]["exterior"]["standard"], 3);
    assert_eq!(table["addOns"][2]["id"], "hardWater");
    assert_eq!(table["addOns"][2]["price"], 3);

    // Served table parses back into the same structure
    let parsed: PricingTable = serde_json::from_value(table).unwrap();
    assert_eq!(parsed, PricingTable::default());
}

#[tokio::test]
async fn test_estimate_ready() {
    let (status, body) = post_estimate(
        app_with(Config::default()),
        json!({
            "customer": "residential",
            "serviceLevel": "inOut",
            "windows": {"standard": 8, "large": "2", "slider": "1"},
            "addOns": {"screens": 8, "hardWater": "2"},
            "accessConfirmed": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 8*7 + 2*10 + 1*16 + 8*1 + 2*3
    assert_eq!(body["subtotal"], 106);
    assert_eq!(body["total"], 106);
    assert_eq!(body["lineItems"], 21);
    assert_eq!(body["status"], json!({"state": "ready", "total": 106}));
    assert_eq!(body["display"], "$106");
}

#[tokio::test]
async fn test_estimate_minimum_charge() {
    let (status, body) = post_estimate(
        app_with(Config::default()),
        json!({
            "customer": "commercial",
            "serviceLevel": "exterior",
            "windows": {"standard": "2"},
            "accessConfirmed": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], 6);
    assert_eq!(body["total"], 40);
    assert_eq!(body["display"], "$40");
}

#[tokio::test]
async fn test_estimate_malformed_counts_are_zero() {
    let (status, body) = post_estimate(
        app_with(Config::default()),
        json!({
            "customer": "residential",
            "serviceLevel": "exterior",
            "windows": {"standard": "abc", "large": -4, "slider": null},
            "accessConfirmed": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"], 0);
    assert_eq!(body["total"], 40);
    assert_eq!(body["status"], json!({"state": "addCounts"}));
    assert_eq!(body["display"], "Add window counts");
}

#[tokio::test]
async fn test_estimate_requires_access_confirmation() {
    let (_, body) = post_estimate(
        app_with(Config::default()),
        json!({
            "customer": "residential",
            "serviceLevel": "exterior",
            "windows": {"standard": 12}
        }),
    )
    .await;

    assert_eq!(body["total"], 48);
    assert_eq!(body["status"], json!({"state": "confirmAccess"}));
    assert_eq!(body["hint"], "Confirm access to unlock the estimate.");
}

#[tokio::test]
async fn test_estimate_bad_request() {
    let (status, body) = post_estimate(
        app_with(Config::default()),
        json!({"customer": "residential", "serviceLevel": "gutters"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Bad Request"}));

    let request = Request::post("/api/estimate")
        .body(Body::from("not json"))
        .unwrap();
    let response = app_with(Config::default()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_estimate_uses_configured_table() {
    let mut config = Config::default();
    config.pricing_table.minimum_charge = 75;

    let (_, body) = post_estimate(
        app_with(config),
        json!({
            "customer": "residential",
            "serviceLevel": "exterior",
            "windows": {"standard": 1},
            "accessConfirmed": true
        }),
    )
    .await;

    assert_eq!(body["total"], 75);
    assert_eq!(body["minimumCharge"], 75);
}
