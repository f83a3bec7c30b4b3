//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Analyze endpoint metrics
    pub analyze_requests: CounterVec,
    pub analyze_duration: HistogramVec,

    // Analysis cache metrics
    pub cache_hits: Counter,
    pub cache_misses: Counter,

    // Extraction upstream metrics
    pub extraction_requests: CounterVec,
    pub extraction_duration: HistogramVec,
    pub fallback_extractions: Counter,

    // Menu snapshot metrics
    pub menu_snapshots: Counter,
    pub analytics_events: Counter,
}

impl Metrics {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let analyze_requests = register_counter_vec_with_registry!(
            Opts::new("analyze_requests_total", "Total menu analyze requests"),
            &["source", "status"],
            registry
        )?;

        let analyze_duration = register_histogram_vec_with_registry!(
            "analyze_request_duration_seconds",
            "Menu analyze request duration in seconds",
            &["source"],
            registry
        )?;

        let cache_hits = register_counter_with_registry!(
            Opts::new("analysis_cache_hits_total", "Total analysis cache hits"),
            registry
        )?;

        let cache_misses = register_counter_with_registry!(
            Opts::new("analysis_cache_misses_total", "Total analysis cache misses"),
            registry
        )?;

        let extraction_requests = register_counter_vec_with_registry!(
            Opts::new(
                "extraction_requests_total",
                "Total extraction upstream requests"
            ),
            &["kind", "status"],
            registry
        )?;

        let extraction_duration = register_histogram_vec_with_registry!(
            "extraction_request_duration_seconds",
            "Extraction upstream request duration in seconds",
            &["kind"],
            registry
        )?;

        let fallback_extractions = register_counter_with_registry!(
            Opts::new(
                "fallback_extractions_total",
                "Total keyword-fallback extractions"
            ),
            registry
        )?;

        let menu_snapshots = register_counter_with_registry!(
            Opts::new("menu_snapshots_total", "Total active menu snapshots written"),
            registry
        )?;

        let analytics_events = register_counter_with_registry!(
            Opts::new("analytics_events_total", "Total analytics events recorded"),
            registry
        )?;

        Ok(Self {
            registry,
            analyze_requests,
            analyze_duration,
            cache_hits,
            cache_misses,
            extraction_requests,
            extraction_duration,
            fallback_extractions,
            menu_snapshots,
            analytics_events,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an analyze request outcome
    pub fn record_analyze(&self, source: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.analyze_requests
            .with_label_values(&[source, status])
            .inc();
    }

    /// Record a cache lookup outcome
    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.inc();
        } else {
            self.cache_misses.inc();
        }
    }

    /// Record an extraction upstream call outcome
    pub fn record_extraction(&self, kind: &str, status: &str) {
        self.extraction_requests
            .with_label_values(&[kind, status])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_analyze() {
        let metrics = Metrics::new().unwrap();
        metrics.record_analyze("text", true);
        metrics.record_analyze("image", false);
        // Metrics should be recorded without panicking
    }

    #[test]
    fn test_export_contains_registered_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.record_cache_lookup(true);
        metrics.record_cache_lookup(false);

        let exported = metrics.export_prometheus();
        assert!(exported.contains("analysis_cache_hits_total"));
        assert!(exported.contains("analysis_cache_misses_total"));
    }
}
