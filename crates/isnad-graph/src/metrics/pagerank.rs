//! PageRank by fixed-count power iteration.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Every node starts at
//! `1 / N`.
//!
//! Each iteration reads only the previous buffer and writes a second one,
//! then the two are swapped (Jacobi update). Scores therefore do not depend
//! on the order nodes are visited within an iteration, and identical input
//! yields bit-identical output.
//!
//! The iteration count is fixed; there is no convergence test.
//!
//! # Dangling Nodes
//!
//! A node with no outgoing edges passes its rank to nobody, so mass leaks
//! every iteration and the final scores sum to less than 1 whenever such
//! nodes exist. Exported scores have always been computed this way and
//! downstream consumers compare against them, so the leak is kept.

use petgraph::{
    Direction,
    visit::{IntoNodeIdentifiers, NodeIndexable},
};
use tracing::{debug, instrument};

use isnad_core::config::PageRankConfig;

use crate::graph::IsnadGraph;

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Scores indexed by `NodeIndex`.
    pub scores: Vec<f64>,
    pub iterations: usize,
}

impl PageRankResult {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// Compute PageRank over `g`.
#[must_use]
#[instrument(skip(g, config), fields(nodes = g.node_count(), iterations = config.iterations))]
pub fn pagerank(g: &IsnadGraph, config: &PageRankConfig) -> PageRankResult {
    let graph = &g.graph;
    let n = graph.node_count();

    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
        };
    }

    // Per node: its in-neighbours and its own out-degree. Built once so the
    // iteration loop touches only flat vectors.
    let out_degree: Vec<f64> = graph
        .node_identifiers()
        .map(|idx| graph.neighbors_directed(idx, Direction::Outgoing).count() as f64)
        .collect();
    let incoming: Vec<Vec<usize>> = graph
        .node_identifiers()
        .map(|idx| {
            graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|m| graph.to_index(m))
                .collect()
        })
        .collect();

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut next = vec![0.0_f64; n];

    for _ in 0..config.iterations {
        for (v, slot) in next.iter_mut().enumerate() {
            let inflow: f64 = incoming[v].iter().map(|&u| ranks[u] / out_degree[u]).sum();
            *slot = config.damping.mul_add(inflow, base);
        }
        std::mem::swap(&mut ranks, &mut next);
    }

    debug!(total = ranks.iter().sum::<f64>(), "pagerank finished");

    PageRankResult {
        scores: ranks,
        iterations: config.iterations,
    }
}

/// Write PageRank scores onto every node.
pub fn apply_pagerank(g: &mut IsnadGraph, result: &PageRankResult) {
    for (node, &score) in g.graph.node_weights_mut().zip(&result.scores) {
        node.metrics.pagerank = score;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
