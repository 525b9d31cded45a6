//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C → Shutdown::trigger → broadcast → server stops accepting, drains
//! ```
//!
//! The process holds no durable state, so it is safe to kill and restart at
//! any point; graceful shutdown only exists to drain in-flight responses.

pub mod shutdown;

pub use shutdown::Shutdown;
