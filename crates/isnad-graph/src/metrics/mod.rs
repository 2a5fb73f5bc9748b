//! Centrality metrics for the narrator graph.
//!
//! # Overview
//!
//! Three measures, each answering a different question:
//!
//! - **Degree** (`degree`): how many distinct narrators did someone receive
//!   from and pass on to?
//! - **PageRank** (`pagerank`): whose reports flow from other influential
//!   narrators?
//! - **Betweenness** (`betweenness`): who bridges otherwise separate parts
//!   of the transmission network?
//!
//! Each stage reads the finished graph and writes its scores onto
//! [`NodeMetrics`](crate::graph::NodeMetrics). The stages are independent;
//! [`compute_metrics`] runs all three and records a timing span for each.
//!
//! ```rust,ignore
//! use isnad_graph::metrics::compute_metrics;
//!
//! let summary = compute_metrics(&mut graph, &config.pagerank, &config.betweenness);
//! ```

pub mod betweenness;
pub mod degree;
pub mod pagerank;

use isnad_core::{
    config::{BetweennessConfig, PageRankConfig},
    timing::timed,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::graph::IsnadGraph;

pub use betweenness::{BetweennessResult, apply_betweenness, betweenness};
pub use degree::{apply_degrees, degrees};
pub use pagerank::{PageRankResult, apply_pagerank, pagerank};

/// What a metrics run did, for logging and the CLI summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub nodes: usize,
    pub pagerank_iterations: usize,
    /// Sum of all PageRank scores; below 1 when sinks leak rank.
    pub pagerank_total: f64,
    pub betweenness_sampled: usize,
    pub betweenness_scale: f64,
}

/// Compute degree, PageRank and sampled betweenness, writing every score
/// onto the graph's nodes.
#[instrument(skip_all, fields(nodes = g.node_count(), edges = g.edge_count()))]
pub fn compute_metrics(
    g: &mut IsnadGraph,
    pagerank_config: &PageRankConfig,
    betweenness_config: &BetweennessConfig,
) -> MetricsSummary {
    timed("metrics.degree", || apply_degrees(g));

    let pr = timed("metrics.pagerank", || pagerank(g, pagerank_config));
    apply_pagerank(g, &pr);

    let bc = timed("metrics.betweenness", || betweenness(g, betweenness_config));
    apply_betweenness(g, &bc);

    let summary = MetricsSummary {
        nodes: g.node_count(),
        pagerank_iterations: pr.iterations,
        pagerank_total: pr.total(),
        betweenness_sampled: bc.sampled,
        betweenness_scale: bc.scale,
    };
    info!(
        sampled = summary.betweenness_sampled,
        scale = summary.betweenness_scale,
        pagerank_total = summary.pagerank_total,
        "metrics computed"
    );
    summary
}
