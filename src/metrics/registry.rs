//! Registers every area's metrics and reports name conflicts.

use crate::metrics::{AreaMetrics, MetricDoc};
use std::collections::HashMap;
use tracing::{info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_area_metrics::<super::sources::SourceMetrics>(&mut all_metrics);
    register_area_metrics::<super::query::QueryMetrics>(&mut all_metrics);

    info!("Registered {} metrics", all_metrics.len());
}

fn register_area_metrics<T: AreaMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let area = T::area_name();
    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!("Metric name conflict: '{}' registered again by '{}'", doc.name, area);
        } else {
            all_metrics.insert(doc.name, doc);
        }
    }
}
