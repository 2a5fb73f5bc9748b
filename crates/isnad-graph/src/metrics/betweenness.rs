//! Sampled betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a narrator lies on shortest transmission
//! paths between other narrators. High scores mark "bridges" that connect
//! otherwise separate parts of the network.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs, restricted to a sample of
//! source nodes:
//!
//! 1. For each sampled source `s`, BFS over outgoing edges computes
//!    distances and shortest-path counts (`sigma`).
//! 2. Dependencies accumulate in reverse BFS order (farthest first):
//!    `delta(v) += sigma(v) / sigma(w) * (1 + delta(w))` for every
//!    predecessor `v` of `w` on a shortest path.
//! 3. `delta(w)` is added to the score of every `w != s`.
//!
//! Edge weights are ignored; every hop costs 1.
//!
//! # Sampling
//!
//! Sources are the first `min(sample_size, N)` nodes in insertion order.
//! There is no randomness, so repeated runs agree exactly. When fewer than
//! `N` sources ran, scores are multiplied by `N / sampled` to extrapolate.
//! The result is an estimate unless every node was sampled.
//!
//! Complexity: O(S * (V + E)) for `S` sampled sources.

use std::collections::VecDeque;

use petgraph::{
    Direction,
    visit::{IntoNodeIdentifiers, NodeIndexable},
};
use tracing::{debug, instrument};

use isnad_core::config::BetweennessConfig;

use crate::graph::IsnadGraph;

/// Result of a sampled betweenness run.
#[derive(Debug, Clone, PartialEq)]
pub struct BetweennessResult {
    /// Scaled scores indexed by `NodeIndex`.
    pub scores: Vec<f64>,
    /// Number of BFS sources actually processed.
    pub sampled: usize,
    /// Factor applied to the raw sums (`N / sampled`, or 1).
    pub scale: f64,
}

impl BetweennessResult {
    /// Whether every node served as a source, making the scores exact.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.sampled == self.scores.len()
    }
}

/// Compute sampled betweenness over `g`.
#[must_use]
#[instrument(skip(g, config), fields(nodes = g.node_count(), sample_size = config.sample_size))]
pub fn betweenness(g: &IsnadGraph, config: &BetweennessConfig) -> BetweennessResult {
    let graph = &g.graph;
    let n = graph.node_count();
    let sampled = config.sample_size.min(n);

    let mut cb = vec![0.0_f64; n];
    if sampled == 0 {
        return BetweennessResult {
            scores: cb,
            sampled,
            scale: 1.0,
        };
    }

    // Forward adjacency as flat index lists, built once for all sources.
    let successors: Vec<Vec<usize>> = graph
        .node_identifiers()
        .map(|idx| {
            graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|m| graph.to_index(m))
                .collect()
        })
        .collect();

    // Scratch buffers, reset per source.
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for s in 0..sampled {
        stack.clear();
        queue.clear();
        for p in &mut predecessors {
            p.clear();
        }
        sigma.fill(0.0);
        dist.fill(-1);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &successors[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    let mut scale = 1.0;
    if sampled < n {
        scale = n as f64 / sampled as f64;
        for score in &mut cb {
            *score *= scale;
        }
    }

    debug!(sampled, scale, "betweenness finished");

    BetweennessResult {
        scores: cb,
        sampled,
        scale,
    }
}

/// Write betweenness scores onto every node.
pub fn apply_betweenness(g: &mut IsnadGraph, result: &BetweennessResult) {
    for (node, &score) in g.graph.node_weights_mut().zip(&result.scores) {
        node.metrics.betweenness = score;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
