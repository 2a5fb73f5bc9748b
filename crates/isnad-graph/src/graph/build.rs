//! Narrator citation graph construction from transmission chains.
//!
//! # Overview
//!
//! Every hadith carries a chain of narrator ids. Each consecutive pair in a
//! chain becomes a directed edge in chain order, so `[a, b, c]` yields
//! `a → b` and `b → c`. Chains with fewer than two narrators are not
//! transmissions and contribute nothing.
//!
//! ## Edge Weights
//!
//! An edge is keyed by its ordered `(source, target)` pair. Seeing the same
//! pair again (in the same chain or another one) increments the edge weight
//! instead of adding a parallel edge. Degrees count distinct neighbours, not
//! weight.
//!
//! ## Adjacency
//!
//! The graph is a [`petgraph`] `DiGraph` holding at most one edge per ordered
//! pair, so the outgoing neighbour list of a node *is* its forward adjacency
//! set and the incoming list its reverse set. Both are updated by the single
//! `add_edge` call that creates an edge and can't drift from the edge set.
//!
//! ## Node Order
//!
//! Nodes are never removed, so `NodeIndex` order is node insertion order.
//! Betweenness sampling and leaderboard tie-breaks rely on it.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use isnad_core::model::{HadithRecord, NarratorId, is_transmission_chain};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::directory::NarratorDirectory;
use super::group::NarratorGroup;

// ---------------------------------------------------------------------------
// Node data
// ---------------------------------------------------------------------------

/// Descriptive attributes fixed when a node is first inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttributes {
    pub name: String,
    pub grade: String,
    pub group: NarratorGroup,
    /// Whether a narrator record backed the attributes.
    pub resolved: bool,
}

/// Metrics written by [`crate::metrics`]. All zero until computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub pagerank: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub betweenness: f64,
}

/// A narrator in the citation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NarratorNode {
    pub id: NarratorId,
    pub name: String,
    pub grade: String,
    pub group: NarratorGroup,
    pub resolved: bool,
    pub metrics: NodeMetrics,
}

/// Errors from graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("narrator {0} is not a node in the graph")]
    UnknownNode(NarratorId),
}

// ---------------------------------------------------------------------------
// IsnadGraph
// ---------------------------------------------------------------------------

/// The directed, weighted narrator citation graph.
///
/// An edge `a → b` with weight `w` means `w` chain steps passed a report
/// from `a` to `b`.
#[derive(Debug, Clone, Default)]
pub struct IsnadGraph {
    /// Nodes = narrators, edge weight = number of chain steps.
    pub graph: DiGraph<NarratorNode, u32>,
    /// Narrator id to `NodeIndex`.
    pub node_map: HashMap<NarratorId, NodeIndex>,
}

impl IsnadGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from hadith chains in record order.
    ///
    /// Narrator names and grades are resolved through `directory`; ids it
    /// doesn't know become placeholder nodes.
    #[must_use]
    #[instrument(skip_all, fields(hadiths = hadiths.len(), narrators = directory.len()))]
    pub fn from_hadiths(hadiths: &[HadithRecord], directory: &NarratorDirectory<'_>) -> Self {
        let mut graph = Self::new();
        let mut transmissions = 0_usize;

        for (idx, hadith) in hadiths.iter().enumerate() {
            if idx % 1000 == 0 {
                debug!(processed = idx, total = hadiths.len(), "building graph");
            }
            if hadith.is_transmission() {
                graph.add_chain(&hadith.chain, directory);
                transmissions += 1;
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            transmissions,
            skipped = hadiths.len() - transmissions,
            "graph built"
        );
        graph
    }

    /// Insert a narrator. A second call for the same id is a no-op and the
    /// first attributes stay.
    pub fn add_node(&mut self, id: NarratorId, attributes: NodeAttributes) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(NarratorNode {
            id,
            name: attributes.name,
            grade: attributes.grade,
            group: attributes.group,
            resolved: attributes.resolved,
            metrics: NodeMetrics::default(),
        });
        self.node_map.insert(id, idx);
        idx
    }

    /// Record one transmission step `from → to` and return the edge's new
    /// weight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either endpoint has not been
    /// added.
    pub fn add_edge(&mut self, from: NarratorId, to: NarratorId) -> Result<u32, GraphError> {
        let a = self.node_index(from).ok_or(GraphError::UnknownNode(from))?;
        let b = self.node_index(to).ok_or(GraphError::UnknownNode(to))?;

        if let Some(edge) = self.graph.find_edge(a, b) {
            let weight = &mut self.graph[edge];
            *weight += 1;
            Ok(*weight)
        } else {
            self.graph.add_edge(a, b, 1);
            Ok(1)
        }
    }

    /// Add one chain and return the number of edge steps recorded
    /// (`len - 1`, or 0 for chains shorter than two).
    pub fn add_chain(&mut self, chain: &[NarratorId], directory: &NarratorDirectory<'_>) -> usize {
        if !is_transmission_chain(chain) {
            return 0;
        }

        for &id in chain {
            if !self.contains(id) {
                self.add_node(id, directory.attributes(id));
            }
        }

        for pair in chain.windows(2) {
            let recorded = self.add_edge(pair[0], pair[1]);
            debug_assert!(recorded.is_ok(), "chain endpoints were inserted above");
        }
        chain.len() - 1
    }

    #[must_use]
    pub fn contains(&self, id: NarratorId) -> bool {
        self.node_map.contains_key(&id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct ordered pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of all edge weights (total chain steps).
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| u64::from(e.weight))
            .sum()
    }

    #[must_use]
    pub fn node_index(&self, id: NarratorId) -> Option<NodeIndex> {
        self.node_map.get(&id).copied()
    }

    #[must_use]
    pub fn node(&self, id: NarratorId) -> Option<&NarratorNode> {
        self.node_index(id).map(|idx| &self.graph[idx])
    }

    /// Weight of the edge `from → to`, if present.
    #[must_use]
    pub fn edge_weight(&self, from: NarratorId, to: NarratorId) -> Option<u32> {
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    /// Narrators in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NarratorNode> {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    /// Edges as `(source, target, weight)` in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (NarratorId, NarratorId, u32)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].id,
                self.graph[e.target()].id,
                *e.weight(),
            )
        })
    }

    /// Forward adjacency: narrators `id` transmitted to.
    pub fn successors(&self, id: NarratorId) -> impl Iterator<Item = NarratorId> + '_ {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Reverse adjacency: narrators `id` received from.
    pub fn predecessors(&self, id: NarratorId) -> impl Iterator<Item = NarratorId> + '_ {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(
        &self,
        id: NarratorId,
        dir: Direction,
    ) -> impl Iterator<Item = NarratorId> + '_ {
        self.node_index(id)
            .into_iter()
            .flat_map(move |idx| self.graph.neighbors_directed(idx, dir))
            .map(|n| self.graph[n].id)
    }

    /// BLAKE3 fingerprint of the weighted edge set.
    ///
    /// Independent of insertion order, so two runs over the same chains
    /// produce the same value.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for (source, target, weight) in edges {
            hasher.update(&source.to_le_bytes());
            hasher.update(&target.to_le_bytes());
            hasher.update(&weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use isnad_core::model::NarratorRecord;

    fn empty_directory() -> NarratorDirectory<'static> {
        NarratorDirectory::default()
    }

    fn build(chains: &[&[NarratorId]]) -> IsnadGraph {
        let dir = empty_directory();
        let mut g = IsnadGraph::new();
        for chain in chains {
            g.add_chain(chain, &dir);
        }
        g
    }

    #[test]
    fn short_chains_add_nothing() {
        let g = build(&[&[], &[7]]);
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn add_chain_reports_every_step() {
        let dir = empty_directory();
        let mut g = IsnadGraph::new();
        assert_eq!(g.add_chain(&[1, 2, 1, 2], &dir), 3);
        assert_eq!(g.add_chain(&[5], &dir), 0);
        assert_eq!(g.edge_weight(1, 2), Some(2));
        assert_eq!(g.edge_weight(2, 1), Some(1));
    }

    #[test]
    fn chain_of_k_adds_k_minus_one_edges() {
        let g = build(&[&[1, 2, 3, 4]]);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge_weight(1, 2), Some(1));
        assert_eq!(g.edge_weight(3, 4), Some(1));
        assert_eq!(g.edge_weight(2, 1), None, "edges follow chain order");
    }

    #[test]
    fn repeated_pairs_accumulate_weight() {
        let g = build(&[&[1, 2, 3], &[1, 2], &[]]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(1, 2), Some(2));
        assert_eq!(g.edge_weight(2, 3), Some(1));
        assert_eq!(g.total_weight(), 3);
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut g = IsnadGraph::new();
        let first = NodeAttributes {
            name: "First".into(),
            grade: "Thiqah".into(),
            group: NarratorGroup::Reliable,
            resolved: true,
        };
        let second = NodeAttributes {
            name: "Second".into(),
            grade: "Daif".into(),
            group: NarratorGroup::Unclassified,
            resolved: true,
        };
        let a = g.add_node(1, first);
        let b = g.add_node(1, second);
        assert_eq!(a, b);
        assert_eq!(g.node_count(), 1);
        let node = g.node(1).expect("node 1");
        assert_eq!(node.name, "First");
        assert_eq!(node.group, NarratorGroup::Reliable);
    }

    #[test]
    fn add_edge_requires_both_endpoints() {
        let mut g = build(&[&[1, 2]]);
        assert_eq!(g.add_edge(1, 9), Err(GraphError::UnknownNode(9)));
        assert_eq!(g.add_edge(8, 1), Err(GraphError::UnknownNode(8)));
        assert_eq!(g.add_edge(1, 2), Ok(2));
    }

    #[test]
    fn adjacency_matches_edges() {
        let g = build(&[&[1, 2, 3], &[4, 2], &[1, 3]]);
        let mut succ: Vec<_> = g.successors(1).collect();
        succ.sort_unstable();
        assert_eq!(succ, vec![2, 3]);

        let mut pred: Vec<_> = g.predecessors(2).collect();
        pred.sort_unstable();
        assert_eq!(pred, vec![1, 4]);

        assert_eq!(g.successors(42).count(), 0, "unknown id has no neighbours");
    }

    #[test]
    fn unknown_narrators_get_placeholders() {
        let recs = vec![NarratorRecord {
            scholar_indx: Some(1),
            name: "Malik".into(),
            grade: "Thiqah".into(),
            ..NarratorRecord::default()
        }];
        let dir = NarratorDirectory::new(&recs);
        let mut g = IsnadGraph::new();
        g.add_chain(&[1, 2], &dir);

        let known = g.node(1).expect("node 1");
        assert_eq!(known.name, "Malik");
        assert!(known.resolved);

        let unknown = g.node(2).expect("node 2");
        assert_eq!(unknown.name, "Unknown (2)");
        assert_eq!(unknown.grade, "Unknown");
        assert_eq!(unknown.group, NarratorGroup::Unclassified);
        assert!(!unknown.resolved);
    }

    #[test]
    fn nodes_iterate_in_insertion_order() {
        let g = build(&[&[5, 3], &[9, 3, 1]]);
        let ids: Vec<_> = g.nodes().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 3, 9, 1]);
    }

    #[test]
    fn self_loop_is_a_single_edge() {
        let g = build(&[&[4, 4, 4]]);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(4, 4), Some(2));
    }

    #[test]
    fn content_hash_ignores_insertion_order_but_sees_weights() {
        let a = build(&[&[1, 2], &[3, 4]]);
        let b = build(&[&[3, 4], &[1, 2]]);
        assert_eq!(a.content_hash(), b.content_hash());

        let c = build(&[&[1, 2], &[3, 4], &[1, 2]]);
        assert_ne!(a.content_hash(), c.content_hash());
        assert!(a.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn from_hadiths_uses_every_record() {
        let hadiths = vec![
            HadithRecord {
                chain: vec![1, 2, 3],
                ..HadithRecord::default()
            },
            HadithRecord {
                chain: vec![1, 2],
                ..HadithRecord::default()
            },
            HadithRecord::default(),
        ];
        let g = IsnadGraph::from_hadiths(&hadiths, &empty_directory());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_weight(1, 2), Some(2));
    }
}
