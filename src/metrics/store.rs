//! Shared traffic counters.
//!
//! # Responsibilities
//! - Track total/active requests, errors, and cumulative response time
//! - Support many concurrent writers with atomic per-field updates
//! - Guarantee exactly-once release of the active count per request
//!
//! # Design Decisions
//! - No global lock: each field is an independent atomic, matching the
//!   relaxed consistency a live dashboard needs
//! - Request lifecycle is an RAII guard, so every exit path (success,
//!   transport failure, client disconnect) releases the active count

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::snapshot::MetricsSnapshot;

/// Process-wide request counters, shared by every in-flight request.
///
/// Updates use relaxed ordering: fields are aggregates read independently by
/// the snapshot, never coordinated across each other.
#[derive(Debug, Default)]
pub struct MetricsStore {
    total_requests: AtomicU64,
    active_requests: AtomicI64,
    total_errors: AtomicU64,
    total_response_time_ms: AtomicU64,
}

impl MetricsStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record the start of a proxied request.
    ///
    /// Increments the total and active counts and returns a guard that must
    /// be settled exactly once: [`InFlight::complete`] on the finishing edge
    /// of the response stream, [`InFlight::fail`] on a transport failure, or
    /// a plain drop if the client goes away first.
    pub fn begin_request(self: &Arc<Self>) -> InFlight {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.active_requests.fetch_add(1, Ordering::Relaxed);
        InFlight {
            store: Arc::clone(self),
            started: Instant::now(),
            settled: false,
        }
    }

    /// Read the current counter values.
    ///
    /// Fields are loaded independently; a snapshot taken while requests are
    /// in flight may mix values from slightly different instants.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time_ms = self.total_response_time_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_requests,
            active_requests: self.active_requests.load(Ordering::Relaxed),
            total_errors: self.total_errors.load(Ordering::Relaxed),
            average_response_time_ms: average_ms(total_response_time_ms, total_requests),
        }
    }
}

/// Average response time rounded to two decimal places, 0 when idle.
fn average_ms(total_response_time_ms: u64, total_requests: u64) -> f64 {
    if total_requests == 0 {
        return 0.0;
    }
    (total_response_time_ms as f64 / total_requests as f64 * 100.0).round() / 100.0
}

/// Guard for one in-flight request.
///
/// Holds the start timestamp and a handle back to the store. Consuming it via
/// [`complete`](Self::complete) or [`fail`](Self::fail) records the outcome;
/// dropping it unsettled releases the active count without recording one.
/// Either way the active count is released exactly once.
#[derive(Debug)]
pub struct InFlight {
    store: Arc<MetricsStore>,
    started: Instant,
    settled: bool,
}

impl InFlight {
    /// Settle as a successful round trip: release the active count and add
    /// the elapsed wall time to the cumulative response time.
    pub fn complete(mut self) {
        self.settled = true;
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.store.active_requests.fetch_sub(1, Ordering::Relaxed);
        self.store
            .total_response_time_ms
            .fetch_add(elapsed_ms, Ordering::Relaxed);
    }

    /// Settle as a transport failure: count an error and release the active
    /// count. No response time is recorded for failed requests.
    pub fn fail(mut self) {
        self.settled = true;
        self.store.total_errors.fetch_add(1, Ordering::Relaxed);
        self.store.active_requests.fetch_sub(1, Ordering::Relaxed);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            // Client disconnected before the response stream finished.
            self.store.active_requests.fetch_sub(1, Ordering::Relaxed);
            tracing::trace!("request abandoned before completion");
        }
    }
}
