use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe the site's metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "phone_reveal_requests_total",
        "Phone reveal requests by outcome"
    );
    describe_counter!(
        "estimate_requests_total",
        "Estimates computed through the API"
    );
    describe_gauge!(
        "rate_limit_entries",
        "Client keys tracked by the in-memory rate limiter"
    );
    describe_gauge!("site_info", "Site version information");

    gauge!("site_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a gate outcome (`ok`, `forbidden`, `rate_limited`, `unavailable`)
pub fn record_reveal(outcome: &'static str) {
    counter!("phone_reveal_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_estimate() {
    counter!("estimate_requests_total").increment(1);
}

pub fn record_tracked_keys(count: usize) {
    gauge!("rate_limit_entries").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        init_metric_descriptions();

        // No recorder installed: calls must be no-ops, not panics
        record_reveal("ok");
        record_reveal("rate_limited");
        record_estimate();
        record_tracked_keys(3);
    }

    #[test]
    fn test_render_with_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_reveal("forbidden");
        });

        assert!(handle.render().contains("phone_reveal_requests_total"));
    }
}
