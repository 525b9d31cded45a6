//! Transparent metering reverse proxy.
//!
//! Forwards every inbound request to a single fixed upstream while tracking
//! aggregate traffic counters, exposed as JSON at `/metrics` and rendered by
//! a live page at `/dashboard`.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                   PROXY                      │
//!                    │                                              │
//!   Client Request   │  ┌─────────┐   GET /metrics  ┌────────────┐ │
//!   ─────────────────┼─▶│  http   │────────────────▶│  metrics   │ │
//!                    │  │ server  │   GET /dashboard│  snapshot  │ │
//!                    │  └────┬────┘────────────────▶└────────────┘ │
//!                    │       │ everything else            ▲        │
//!                    │       ▼                            │        │
//!   Client Response  │  ┌─────────┐    ┌──────────┐  counters     │
//!   ◀────────────────┼──│ forward │───▶│  hyper   │──────┼────────┼──▶ Upstream
//!                    │  │ + guard │◀───│  client  │◀─────┘        │
//!                    │  └─────────┘    └──────────┘               │
//!                    └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dashboard;
pub mod http;
pub mod lifecycle;
pub mod metrics;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use metrics::{MetricsSnapshot, MetricsStore};
