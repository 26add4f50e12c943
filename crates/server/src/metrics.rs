//! Prometheus metrics recorder and `/metrics` endpoint handler

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

// Metric name constants to avoid typos across call sites.

/// HTTP requests total (counter, labels: endpoint)
pub const REQUESTS_TOTAL: &str = "http_requests_total";
/// HTTP errors total (counter, labels: endpoint)
pub const ERRORS_TOTAL: &str = "http_errors_total";
/// Transcription latency seconds (histogram)
pub const STT_LATENCY_SECONDS: &str = "stt_latency_seconds";
/// Translation latency seconds (histogram)
pub const LLM_LATENCY_SECONDS: &str = "llm_latency_seconds";
/// Synthesis latency seconds (histogram)
pub const TTS_LATENCY_SECONDS: &str = "tts_latency_seconds";
/// Whole-turn latency seconds (histogram)
pub const TOTAL_LATENCY_SECONDS: &str = "total_latency_seconds";

/// Install the Prometheus metrics recorder (global)
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install metrics recorder");
    let _ = PROMETHEUS_HANDLE.set(handle.clone());
    tracing::info!("Prometheus metrics recorder installed");
    handle
}

/// Render Prometheus text format for the `/metrics` route
pub async fn metrics_handler() -> String {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => handle.render(),
        None => {
            tracing::warn!("Metrics requested before recorder initialization");
            String::new()
        },
    }
}

/// Count one request against an endpoint
pub fn record_request(endpoint: &str) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint.to_string()).increment(1);
}

/// Count one failed request against an endpoint
pub fn record_error(endpoint: &str) {
    metrics::counter!(ERRORS_TOTAL, "endpoint" => endpoint.to_string()).increment(1);
}

/// Record transcription phase latency
pub fn record_stt_latency(seconds: f64) {
    metrics::histogram!(STT_LATENCY_SECONDS).record(seconds);
}

/// Record translation phase latency
pub fn record_llm_latency(seconds: f64) {
    metrics::histogram!(LLM_LATENCY_SECONDS).record(seconds);
}

/// Record synthesis phase latency
pub fn record_tts_latency(seconds: f64) {
    metrics::histogram!(TTS_LATENCY_SECONDS).record(seconds);
}

/// Record whole-turn latency
pub fn record_total_latency(seconds: f64) {
    metrics::histogram!(TOTAL_LATENCY_SECONDS).record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_global_install() {
        // Build a recorder + handle without installing globally, so tests
        // cannot conflict over the global recorder slot.
        let handle = PrometheusBuilder::new().build_recorder().handle();

        let output = handle.render();
        assert!(output.is_empty() || output.contains('#') || output.contains('\n'));
    }

    #[test]
    fn test_metric_names_are_snake_case() {
        let names = [
            REQUESTS_TOTAL,
            ERRORS_TOTAL,
            STT_LATENCY_SECONDS,
            LLM_LATENCY_SECONDS,
            TTS_LATENCY_SECONDS,
            TOTAL_LATENCY_SECONDS,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
