#![forbid(unsafe_code)]
//! isnad-core library.
//!
//! Typed input records, the CSV record loader, and pipeline configuration
//! shared by the graph builder and the `isnad` CLI.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the loader boundary, `anyhow::Result`
//!   for configuration and plumbing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod timing;
