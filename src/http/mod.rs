//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, route classification)
//!     → GET /metrics   → counters snapshot (JSON)
//!     → GET /dashboard → static page
//!     → anything else  → forward.rs (stream to/from the upstream)
//! ```

pub mod forward;
pub mod server;

pub use server::HttpServer;
