//! Metrics for catalog queries.

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct QueryMetrics;

impl QueryMetrics {
    pub fn record_query(duration_secs: f64, matches: usize) {
        ::metrics::counter!(area_metric!(counter, "query", "executed")).increment(1);
        ::metrics::histogram!(area_metric!(histogram, "query", "duration_seconds"))
            .record(duration_secs);
        ::metrics::histogram!(area_metric!(histogram, "query", "matches")).record(matches as f64);
    }

    /// A result superseded by a newer request was dropped.
    pub fn record_stale_discarded() {
        ::metrics::counter!(area_metric!(counter, "query", "stale_discarded")).increment(1);
    }

    pub fn record_rejected() {
        ::metrics::counter!(area_metric!(counter, "query", "rejected")).increment(1);
    }
}

impl AreaMetrics for QueryMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(area_metric!(counter, "query", "executed"));
        let _ = counter!(area_metric!(counter, "query", "stale_discarded"));
        let _ = counter!(area_metric!(counter, "query", "rejected"));
        let _ = histogram!(area_metric!(histogram, "query", "duration_seconds"));
        let _ = histogram!(area_metric!(histogram, "query", "matches"));
    }

    fn area_name() -> &'static str {
        "query"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "query", "executed"),
                metric_type: MetricType::Counter,
                help: "Queries run against the catalog",
            },
            MetricDoc {
                name: area_metric!(counter, "query", "stale_discarded"),
                metric_type: MetricType::Counter,
                help: "Query results dropped because a newer request was issued",
            },
            MetricDoc {
                name: area_metric!(counter, "query", "rejected"),
                metric_type: MetricType::Counter,
                help: "Listing requests rejected as invalid",
            },
            MetricDoc {
                name: area_metric!(histogram, "query", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent filtering and paging in seconds",
            },
            MetricDoc {
                name: area_metric!(histogram, "query", "matches"),
                metric_type: MetricType::Histogram,
                help: "Total matches per query",
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_metrics_documentation() {
        QueryMetrics::register_metrics();
        let docs = QueryMetrics::metrics_documentation();
        assert_eq!(docs.len(), 5);
        assert!(docs.iter().all(|d| d.name.starts_with("monst_query_")));
        assert!(docs
            .iter()
            .any(|d| d.name == "monst_query_stale_discarded_total"));
    }
}
