// Private module declaration
mod server;

use prometheus::{
    HistogramOpts, HistogramTimer, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

use crate::domain::order::OrderError;

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for the order endpoints
// ============================================================================
//
// Provides:
// - Order lifecycle counters (created, deleted, validated)
// - Failed operations by operation and error kind
// - Operation latency
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub orders_deleted: IntCounter,
    pub orders_validated: IntCounter,

    pub operation_failures: IntCounterVec,
    pub operation_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders placed")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_deleted = IntCounter::new("orders_deleted_total", "Total orders deleted")?;
        registry.register(Box::new(orders_deleted.clone()))?;

        let orders_validated = IntCounter::new(
            "orders_validated_total",
            "Total orders moved out of the waiting state",
        )?;
        registry.register(Box::new(orders_validated.clone()))?;

        let operation_failures = IntCounterVec::new(
            Opts::new("order_operation_failures_total", "Failed order operations"),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(operation_failures.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new("order_operation_duration_seconds", "Order operation duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_deleted,
            orders_validated,
            operation_failures,
            operation_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Start timing `operation`; the duration is recorded when the timer drops.
    pub fn start_timer(&self, operation: &str) -> HistogramTimer {
        self.operation_duration
            .with_label_values(&[operation])
            .start_timer()
    }

    /// Count `result` as a failure of `operation` if it is one, passing it through.
    pub fn track<T>(&self, operation: &str, result: Result<T, OrderError>) -> Result<T, OrderError> {
        if let Err(error) = &result {
            self.operation_failures
                .with_label_values(&[operation, error.kind()])
                .inc();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_created.inc();
        metrics.operation_failures.with_label_values(&["create_order", "not_found"]).inc();
        metrics.operation_duration.with_label_values(&["create_order"]).observe(0.01);

        assert_eq!(metrics.registry().gather().len(), 5);
    }

    #[test]
    fn test_track_counts_failures_only() {
        let metrics = Metrics::new().unwrap();

        let ok: Result<u32, OrderError> = metrics.track("delete_order", Ok(1));
        assert!(ok.is_ok());
        let err = metrics.track::<()>("delete_order", Err(OrderError::OrderNotFound(3)));
        assert!(err.is_err());

        let failures = metrics
            .operation_failures
            .with_label_values(&["delete_order", "not_found"])
            .get();
        assert_eq!(failures, 1);
    }
}
