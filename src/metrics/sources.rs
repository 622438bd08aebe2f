//! Metrics for catalog source fetches.

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct SourceMetrics;

impl SourceMetrics {
    pub fn record_fetch_success(duration_secs: f64, monsters: usize) {
        ::metrics::counter!(area_metric!(counter, "source", "fetch_success")).increment(1);
        ::metrics::histogram!(area_metric!(histogram, "source", "fetch_duration_seconds"))
            .record(duration_secs);
        ::metrics::gauge!(area_metric!(gauge, "source", "monsters")).set(monsters as f64);
    }

    pub fn record_fetch_error() {
        ::metrics::counter!(area_metric!(counter, "source", "fetch_error")).increment(1);
    }
}

impl AreaMetrics for SourceMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge, histogram};

        let _ = counter!(area_metric!(counter, "source", "fetch_success"));
        let _ = counter!(area_metric!(counter, "source", "fetch_error"));
        let _ = histogram!(area_metric!(histogram, "source", "fetch_duration_seconds"));
        let _ = gauge!(area_metric!(gauge, "source", "monsters"));
    }

    fn area_name() -> &'static str {
        "source"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "source", "fetch_success"),
                metric_type: MetricType::Counter,
                help: "Completed catalog fetches",
            },
            MetricDoc {
                name: area_metric!(counter, "source", "fetch_error"),
                metric_type: MetricType::Counter,
                help: "Failed catalog fetches",
            },
            MetricDoc {
                name: area_metric!(histogram, "source", "fetch_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Duration of a full catalog fetch in seconds",
            },
            MetricDoc {
                name: area_metric!(gauge, "source", "monsters"),
                metric_type: MetricType::Gauge,
                help: "Monsters returned by the last fetch",
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_metrics_registration() {
        SourceMetrics::register_metrics();
        SourceMetrics::record_fetch_success(0.25, 10);
        SourceMetrics::record_fetch_error();
    }

    #[test]
    fn test_metric_names_follow_convention() {
        let docs = SourceMetrics::metrics_documentation();
        assert_eq!(docs.len(), 4);
        for doc in docs {
            assert!(doc.name.starts_with("monst_source_"));
        }
    }
}
