use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    error::AppError,
    handlers::AppState,
    metrics,
    pricing::{
        estimate, sanitize_count_value, CustomerCategory, Estimate, EstimateStatus, PricingTable,
        QuoteCounts, ServiceLevel, UnknownName, WindowType,
    },
};

/// Body of POST /api/estimate
///
/// Count values may be numbers or strings, exactly as typed into the form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub customer: String,
    pub service_level: String,
    #[serde(default)]
    pub windows: HashMap<String, Value>,
    #[serde(default)]
    pub add_ons: HashMap<String, Value>,
    #[serde(default)]
    pub access_confirmed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub minimum_charge: u64,
    pub currency: String,
    pub status: EstimateStatus,
    /// Text for the "Estimated total" line
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// Handle GET /api/pricing
pub async fn get_pricing(State(state): State<AppState>) -> Json<PricingTable> {
    Json(state.config.load().pricing_table.clone())
}

/// Handle POST /api/estimate
pub async fn post_estimate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EstimateResponse>, AppError> {
    let request: EstimateRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let config = state.config.load();
    let response = price_request(&config.pricing_table, &request)?;
    metrics::record_estimate();

    debug!(
        customer = %request.customer,
        service_level = %request.service_level,
        total = response.estimate.total,
        "Estimate computed"
    );

    Ok(Json(response))
}

fn price_request(
    table: &PricingTable,
    request: &EstimateRequest,
) -> Result<EstimateResponse, AppError> {
    let category: CustomerCategory = request
        .customer
        .parse()
        .map_err(|e: UnknownName| AppError::BadRequest(e.to_string()))?;
    let level: ServiceLevel = request
        .service_level
        .parse()
        .map_err(|e: UnknownName| AppError::BadRequest(e.to_string()))?;

    let mut counts = QuoteCounts::new();
    for (name, value) in &request.windows {
        // Unknown window types are ignored, like unknown add-ons
        if let Ok(window) = name.parse::<WindowType>() {
            counts.set_window(window, sanitize_count_value(value));
        }
    }
    for (id, value) in &request.add_ons {
        counts.set_add_on(id.clone(), sanitize_count_value(value));
    }

    let estimate = estimate(table, category, level, &counts);
    let status = estimate.status(request.access_confirmed);

    Ok(EstimateResponse {
        estimate,
        minimum_charge: table.minimum_charge,
        currency: table.currency.clone(),
        status,
        display: status.display(&table.currency),
        hint: status.hint(),
    })
}
