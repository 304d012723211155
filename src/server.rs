use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    config::Config,
    handlers::{self, AppState},
    logging::mask_phone,
    rate_limit::RateLimiter,
    signals::setup_signal_handlers,
};

/// Start the site server
///
/// This function:
/// 1. Initializes logging and metrics
/// 2. Builds the rate limiter and starts its eviction sweep
/// 3. Sets up signal handlers for graceful shutdown and config reload
/// 4. Serves requests until a shutdown signal arrives
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    crate::logging::init_tracing(&config.server.log_level, &config.server.log_format);
    info!("Stellar View site starting...");

    let metrics_handle = if config.metrics.enabled {
        match crate::metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit).await?);
    tokio::spawn({
        let limiter = limiter.clone();
        let every = Duration::from_secs(config.rate_limit.sweep_interval_seconds);
        async move {
            limiter.sweep_loop(every).await;
        }
    });

    // Wrap config in ArcSwap for atomic reload support
    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState::new(config_swap, limiter);
    let app = create_router(state, &config, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Listening on {}", addr);
    info!(
        phone = %mask_phone(config.contact.phone()),
        rate_limit = config.rate_limit.max_requests,
        window_seconds = config.rate_limit.window_seconds,
        backend = ?config.rate_limit.backend,
        "Configuration loaded"
    );
    if config.contact.phone().is_none() {
        warn!(
            "{} is not set; phone reveal requests will return 503",
            crate::config::PHONE_ENV_VAR
        );
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Build the router with every route and middleware
///
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn create_router(
    state: AppState,
    config: &Config,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/phone",
            post(handlers::phone::reveal_phone).fallback(handlers::phone::method_not_allowed),
        )
        .route("/api/pricing", get(handlers::pricing::get_pricing))
        .route("/api/estimate", post(handlers::pricing::post_estimate))
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route(
                &config.metrics.endpoint,
                get(handlers::metrics_handler::metrics),
            )
            .with_state(Arc::new(handle));
        app = app.merge(metrics_routes);
    }

    app.layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::Quota;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app(config: Config) -> Router {
        let limiter = Arc::new(RateLimiter::in_memory(Quota::from(&config.rate_limit)));
        let state = AppState::new(Arc::new(ArcSwap::from_pointee(config.clone())), limiter);
        create_router(state, &config, None)
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app(Config::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_without_handle() {
        let response = app(Config::default())
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_route_with_handle() {
        let config = Config::default();
        let limiter = Arc::new(RateLimiter::in_memory(Quota::from(&config.rate_limit)));
        let state = AppState::new(Arc::new(ArcSwap::from_pointee(config.clone())), limiter);
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();

        let response = create_router(state, &config, Some(handle))
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = Config::default();
        config.server.body_limit_bytes = 8;

        let response = app(config)
            .oneshot(
                Request::post("/api/estimate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"customer":"residential","serviceLevel":"exterior"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
