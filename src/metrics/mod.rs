//! Metrics for the catalog service.
//!
//! Each area (sources, queries) owns a submodule with its metric names and
//! recording helpers. All names share the `monst_` prefix.

pub mod query;
pub mod registry;
pub mod sources;

pub use query::QueryMetrics;
pub use sources::SourceMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

use crate::error::{CatalogError, Result};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder and registers every metric.
///
/// Idempotent. With `listen` set, an HTTP exporter serves `/metrics` on that
/// address from the current Tokio runtime. The server's own `/metrics` route
/// reads through [`render`] either way.
pub fn init_metrics(listen: Option<SocketAddr>) {
    INIT.call_once(|| match install(listen) {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already set");
            }
            registry::register_all_metrics();
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
}

fn install(listen: Option<SocketAddr>) -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();
    let Some(addr) = listen else {
        return builder
            .install_recorder()
            .map_err(|e| CatalogError::Config(e.to_string()));
    };

    let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
        CatalogError::Config(format!("serving metrics on {addr} needs a Tokio runtime"))
    })?;
    let (recorder, exporter) = {
        let _entered = runtime.enter();
        builder
            .with_http_listener(addr)
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?
    };
    let handle = recorder.handle();
    ::metrics::set_global_recorder(recorder).map_err(|e| CatalogError::Config(e.to_string()))?;

    runtime.spawn(async move {
        if let Err(e) = exporter.await {
            warn!("Prometheus HTTP exporter stopped: {}", e);
        }
    });
    info!("Prometheus HTTP exporter listening on http://{}/metrics", addr);
    Ok(handle)
}

/// Current metrics in Prometheus text format, if the recorder is installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Metrics owned by one area of the service.
pub trait AreaMetrics {
    /// Pre-registers the area's metrics so they appear before first use.
    fn register_metrics();

    fn area_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Builds a metric name following `monst_{area}_{name}[_total]`.
macro_rules! area_metric {
    (counter, $area:literal, $name:literal) => {
        concat!("monst_", $area, "_", $name, "_total")
    };
    (histogram, $area:literal, $name:literal) => {
        concat!("monst_", $area, "_", $name)
    };
    (gauge, $area:literal, $name:literal) => {
        concat!("monst_", $area, "_", $name)
    };
}

pub(crate) use area_metric;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_values_render_under_area_names() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            QueryMetrics::register_metrics();
            QueryMetrics::record_query(0.002, 42);
            QueryMetrics::record_stale_discarded();
            SourceMetrics::record_fetch_success(0.5, 9000);
        });

        let text = handle.render();
        assert!(text.contains("monst_query_executed_total 1"));
        assert!(text.contains("monst_query_stale_discarded_total 1"));
        assert!(text.contains("monst_query_rejected_total 0"));
        assert!(text.contains("monst_source_monsters 9000"));
        assert!(text.contains("monst_query_matches"));
    }
}
