//! Prometheus metrics for the Parcel gateway.
//!
//! The [`GatewayMetrics`] struct owns a dedicated [`Registry`] that the
//! `/metrics` endpoint encodes into the Prometheus text exposition format.
//! Transaction and entity gauges are refreshed from the stores by a
//! background sampler; sweep counters are bumped by the sweep loop itself.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Central collection of gateway-level Prometheus metrics.
pub struct GatewayMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Gauges (sampled from the stores) ────────────────────────────────
    /// Tracked transactions currently in the submitted state.
    pub txs_submitted: IntGauge,
    /// Tracked transactions that reached confirmed.
    pub txs_confirmed: IntGauge,
    /// Tracked transactions that reached failed.
    pub txs_failed: IntGauge,
    /// Registered users.
    pub users: IntGauge,
    /// Off-plan properties.
    pub properties: IntGauge,
    /// Live resale listings.
    pub listings: IntGauge,

    // ── Counters ────────────────────────────────────────────────────────
    /// Reconciliation sweep passes completed.
    pub sweep_passes: IntCounter,
    /// Stuck transactions the sweep resolved to a terminal status.
    pub sweep_resolved: IntCounter,
}

impl GatewayMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let txs_submitted = register_int_gauge_with_registry!(
            Opts::new("parcel_txs_submitted", "Tracked transactions awaiting inclusion"),
            registry
        )
        .expect("metric registration");
        let txs_confirmed = register_int_gauge_with_registry!(
            Opts::new("parcel_txs_confirmed", "Tracked transactions confirmed"),
            registry
        )
        .expect("metric registration");
        let txs_failed = register_int_gauge_with_registry!(
            Opts::new("parcel_txs_failed", "Tracked transactions failed"),
            registry
        )
        .expect("metric registration");
        let users = register_int_gauge_with_registry!(
            Opts::new("parcel_users", "Registered users"),
            registry
        )
        .expect("metric registration");
        let properties = register_int_gauge_with_registry!(
            Opts::new("parcel_offplan_properties", "Off-plan properties"),
            registry
        )
        .expect("metric registration");
        let listings = register_int_gauge_with_registry!(
            Opts::new("parcel_listings", "Live resale listings"),
            registry
        )
        .expect("metric registration");

        let sweep_passes = register_int_counter_with_registry!(
            Opts::new("parcel_sweep_passes_total", "Reconciliation sweep passes"),
            registry
        )
        .expect("metric registration");
        let sweep_resolved = register_int_counter_with_registry!(
            Opts::new(
                "parcel_sweep_resolved_total",
                "Stuck transactions resolved by the sweep"
            ),
            registry
        )
        .expect("metric registration");

        Self {
            registry,
            txs_submitted,
            txs_confirmed,
            txs_failed,
            users,
            properties,
            listings,
            sweep_passes,
            sweep_resolved,
        }
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_register_once() {
        let metrics = GatewayMetrics::new();
        metrics.txs_submitted.set(3);
        metrics.sweep_passes.inc();

        let families = metrics.registry.gather();
        assert!(families.iter().any(|f| f.get_name() == "parcel_txs_submitted"));
        assert!(families
            .iter()
            .any(|f| f.get_name() == "parcel_sweep_passes_total"));
    }
}
