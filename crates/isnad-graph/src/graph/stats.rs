//! Summary statistics for the narrator citation graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: narrators and distinct ordered pairs.
//! - **total_weight**: chain steps, i.e. the sum of edge weights.
//! - **density**: `edge_count / (node_count * (node_count - 1))`, zero for
//!   graphs with 0 or 1 node.
//! - **weakly_connected_components**: disjoint narrator communities when
//!   edge direction is ignored.
//! - **max_in_degree** / **max_out_degree**: largest distinct-neighbour
//!   counts.
//! - **unresolved_nodes**: nodes with no narrator record behind them.

use petgraph::{Direction, algo::connected_components, visit::IntoNodeIdentifiers};
use serde::Serialize;

use crate::graph::build::IsnadGraph;

/// Summary statistics for an [`IsnadGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
    pub density: f64,
    pub weakly_connected_components: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub unresolved_nodes: usize,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(g: &IsnadGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let max_degree = |dir: Direction| {
            g.graph
                .node_identifiers()
                .map(|idx| g.graph.neighbors_directed(idx, dir).count())
                .max()
                .unwrap_or(0)
        };

        Self {
            node_count,
            edge_count,
            total_weight: g.total_weight(),
            density: density(node_count, edge_count),
            weakly_connected_components: connected_components(&g.graph),
            max_in_degree: max_degree(Direction::Incoming),
            max_out_degree: max_degree(Direction::Outgoing),
            unresolved_nodes: g.nodes().filter(|n| !n.resolved).count(),
        }
    }
}

/// Directed graph density. Zero for graphs with fewer than two nodes.
#[must_use]
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
