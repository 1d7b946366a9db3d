use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and describe the calculator's metrics.
/// Fails if a global recorder is already installed.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
pub(crate) fn init_metric_descriptions() {
    describe_counter!(
        "pricing_calculations_total",
        "Total number of pricing calculations"
    );
    describe_histogram!(
        "pricing_calculation_duration_seconds",
        "Time spent validating and calculating a report"
    );
    describe_counter!(
        "pricing_validation_failures_total",
        "Rejected pricing inputs by field and reason"
    );
    describe_counter!(
        "pricing_not_applicable_total",
        "Figures reported as not applicable by metric"
    );
    describe_counter!(
        "pricing_checkout_total",
        "Checkout quotes and completed purchases"
    );
    describe_counter!("pricing_errors_total", "Total number of HTTP errors");
    describe_gauge!(
        "pricing_calculator_info",
        "Calculator version and build information"
    );

    gauge!("pricing_calculator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

pub fn record_calculation(support_tier: &str, contract_length: &str) {
    counter!(
        "pricing_calculations_total",
        "support_tier" => support_tier.to_string(),
        "contract_length" => contract_length.to_string(),
    )
    .increment(1);
}

pub fn record_calculation_duration(duration: Duration) {
    histogram!("pricing_calculation_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_validation_failure(field: &str, reason: &str) {
    counter!(
        "pricing_validation_failures_total",
        "field" => field.to_string(),
        "reason" => reason.to_string(),
    )
    .increment(1);
}

pub fn record_not_applicable(metric: &str) {
    counter!(
        "pricing_not_applicable_total",
        "metric" => metric.to_string(),
    )
    .increment(1);
}

/// `kind` is "quote" or "purchase"
pub fn record_checkout(tier: &str, billing_cycle: &str, kind: &str) {
    counter!(
        "pricing_checkout_total",
        "tier" => tier.to_string(),
        "billing_cycle" => billing_cycle.to_string(),
        "kind" => kind.to_string(),
    )
    .increment(1);
}

pub fn record_error(error_type: &str) {
    counter!(
        "pricing_errors_total",
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}
