//! Point-in-time view of the traffic counters.

use serde::{Deserialize, Serialize};

/// Derived, read-only view served by `GET /metrics`.
///
/// Created by [`MetricsStore::snapshot`](crate::metrics::MetricsStore::snapshot).
/// The wire shape is a compatibility contract with the dashboard page: field
/// names are camelCase and `averageResponseTimeMs` is a number already rounded
/// to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub active_requests: i64,
    pub total_errors: u64,
    pub average_response_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let snapshot = MetricsSnapshot {
            total_requests: 12,
            active_requests: 3,
            total_errors: 1,
            average_response_time_ms: 41.67,
        };

        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalRequests": 12,
                "activeRequests": 3,
                "totalErrors": 1,
                "averageResponseTimeMs": 41.67,
            })
        );
    }

    #[test]
    fn average_is_a_json_number() {
        let snapshot = MetricsSnapshot {
            total_requests: 0,
            active_requests: 0,
            total_errors: 0,
            average_response_time_ms: 0.0,
        };

        let json = serde_json::to_value(snapshot).unwrap();
        assert!(json["averageResponseTimeMs"].is_number());
    }
}
