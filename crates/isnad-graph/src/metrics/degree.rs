//! Degree centrality.
//!
//! In-degree counts distinct narrators a node received from, out-degree
//! the distinct narrators it transmitted to. Edge weight is ignored.
//! Computed once, after the graph is complete.

use petgraph::{Direction, visit::IntoNodeIdentifiers};
use tracing::instrument;

use crate::graph::IsnadGraph;

/// `(in_degree, out_degree)` per node, indexed by `NodeIndex`.
#[must_use]
pub fn degrees(g: &IsnadGraph) -> Vec<(usize, usize)> {
    g.graph
        .node_identifiers()
        .map(|idx| {
            (
                g.graph.neighbors_directed(idx, Direction::Incoming).count(),
                g.graph.neighbors_directed(idx, Direction::Outgoing).count(),
            )
        })
        .collect()
}

/// Write in/out degree onto every node.
#[instrument(skip(g))]
pub fn apply_degrees(g: &mut IsnadGraph) {
    let computed = degrees(g);
    for (node, (in_d, out_d)) in g.graph.node_weights_mut().zip(computed) {
        node.metrics.in_degree = in_d;
        node.metrics.out_degree = out_d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NarratorDirectory;
    use isnad_core::model::NarratorId;

    fn build(chains: &[&[NarratorId]]) -> IsnadGraph {
        let dir = NarratorDirectory::default();
        let mut g = IsnadGraph::new();
        for chain in chains {
            g.add_chain(chain, &dir);
        }
        g
    }

    fn degree_of(g: &IsnadGraph, id: NarratorId) -> (usize, usize) {
        let m = g.node(id).expect("node").metrics;
        (m.in_degree, m.out_degree)
    }

    #[test]
    fn weight_does_not_inflate_degree() {
        let mut g = build(&[&[1, 2, 3], &[1, 2], &[]]);
        apply_degrees(&mut g);
        assert_eq!(degree_of(&g, 1), (0, 1));
        assert_eq!(degree_of(&g, 2), (1, 1));
        assert_eq!(degree_of(&g, 3), (1, 0));
    }

    #[test]
    fn fan_in_and_fan_out() {
        let mut g = build(&[&[1, 9], &[2, 9], &[3, 9], &[9, 4], &[9, 5]]);
        apply_degrees(&mut g);
        assert_eq!(degree_of(&g, 9), (3, 2));
    }

    #[test]
    fn degrees_are_zero_before_apply() {
        let g = build(&[&[1, 2]]);
        assert_eq!(degree_of(&g, 1), (0, 0));
        assert_eq!(degrees(&g), vec![(0, 1), (1, 0)]);
    }
}
