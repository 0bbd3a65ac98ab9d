//! Metrics exporter setup

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use redditminer_core::config::ObservabilityConfig;
use tracing::info;

/// Install the Prometheus exporter if metrics are enabled
///
/// Must be called from inside a tokio runtime: the exporter's HTTP listener is
/// spawned onto it.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.metrics_enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr = config.metrics_socket_addr()?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!(metrics.address = %addr, "Prometheus exporter listening");
    Ok(())
}
