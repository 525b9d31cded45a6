//! Traffic metering subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder:
//!     begin_request() → InFlight guard (total++, active++)
//!     response stream ends → complete() (active--, response time +=)
//!     transport failure   → fail()     (active--, errors++)
//!     client disconnect   → drop       (active--)
//!
//! Reporter:
//!     snapshot() → MetricsSnapshot → GET /metrics (JSON)
//! ```
//!
//! # Design Decisions
//! - Updates are cheap atomic increments; readers never block writers
//! - The guard is the only way to mutate counters after begin_request,
//!   so the active count cannot go negative or leak

pub mod snapshot;
pub mod store;

pub use snapshot::MetricsSnapshot;
pub use store::{InFlight, MetricsStore};
