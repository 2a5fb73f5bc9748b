//! End-to-end pipeline over loaded records.
//!
//! Builder, metrics and artifact selection run strictly in sequence on a
//! single owned graph. Nothing here touches the filesystem: loading happens
//! before [`run`] and writing after it, so a failed load never leaves
//! partial output behind.

use isnad_core::{config::PipelineConfig, loader::LoadedRecords, timing::timed};
use tracing::{info, instrument};

use crate::{
    export::Artifacts,
    graph::{GraphStats, IsnadGraph, NarratorDirectory},
    metrics::{MetricsSummary, compute_metrics},
};

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: IsnadGraph,
    pub stats: GraphStats,
    pub metrics: MetricsSummary,
    pub artifacts: Artifacts,
    /// Hadiths fed to the builder after the `max_hadiths` cut.
    pub processed_hadiths: usize,
}

/// Build the graph, compute metrics and derive the artifacts.
#[must_use]
#[instrument(skip_all, fields(hadiths = records.hadiths.len(), narrators = records.narrators.len()))]
pub fn run(records: &LoadedRecords, config: &PipelineConfig) -> PipelineOutput {
    let hadiths = records.processed_hadiths(config.input.max_hadiths);
    let directory = NarratorDirectory::new(&records.narrators);

    let mut graph = timed("build", || IsnadGraph::from_hadiths(hadiths, &directory));
    let metrics = compute_metrics(&mut graph, &config.pagerank, &config.betweenness);
    let stats = GraphStats::from_graph(&graph);

    let artifacts = timed("export.collect", || {
        Artifacts::collect(
            &graph,
            &directory,
            hadiths,
            config.export.top_n,
            config.export.top_list_len,
        )
    });

    info!(
        processed = hadiths.len(),
        nodes = stats.node_count,
        edges = stats.edge_count,
        exported_nodes = artifacts.graph.nodes.len(),
        "pipeline finished"
    );

    PipelineOutput {
        graph,
        stats,
        metrics,
        artifacts,
        processed_hadiths: hadiths.len(),
    }
}
