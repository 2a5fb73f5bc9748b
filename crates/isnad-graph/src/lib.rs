#![forbid(unsafe_code)]
//! isnad-graph library.
//!
//! Builds the narrator citation graph from transmission chains, computes
//! centrality metrics over it, and exports the JSON artifacts consumed by
//! the visualization front-end.
//!
//! ```text
//! LoadedRecords ─► graph::IsnadGraph ─► metrics::compute_metrics ─► export::Artifacts
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for graph mutation and artifact I/O. The
//!   pipeline itself is infallible once records are loaded.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod export;
pub mod graph;
pub mod metrics;
pub mod pipeline;
