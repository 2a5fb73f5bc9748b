//! Narrator citation graph.
//!
//! # Overview
//!
//! ```text
//! HadithRecord chains + NarratorRecord rows
//!        ↓  directory::NarratorDirectory::new()
//! NarratorDirectory (scholar_indx → record)
//!        ↓  build::IsnadGraph::from_hadiths()
//! IsnadGraph (petgraph DiGraph, weighted, one edge per ordered pair)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, components, degree extremes, …)
//! ```
//!
//! The graph is built once per run and then handed to [`crate::metrics`],
//! which only writes the per-node metric fields.

pub mod build;
pub mod directory;
pub mod group;
pub mod stats;

pub use build::{GraphError, IsnadGraph, NarratorNode, NodeAttributes, NodeMetrics};
pub use directory::NarratorDirectory;
pub use group::NarratorGroup;
pub use stats::{GraphStats, density};
