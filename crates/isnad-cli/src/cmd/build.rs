//! `isnad build`: load both datasets, run the pipeline, write the artifacts.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use isnad_core::{config::PipelineConfig, error::ErrorCode, loader::load_records, timing::timed};
use isnad_graph::{
    export::{WrittenArtifact, write_all},
    graph::GraphStats,
    metrics::MetricsSummary,
    pipeline,
};
use serde::Serialize;
use tracing::info;

use crate::output::{CodedError, OutputMode, coded, pretty_kv, pretty_section, render_mode};

/// Arguments for `isnad build`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Config file (default: `isnad.toml` in the working directory, if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hadith dataset CSV.
    #[arg(long, value_name = "PATH")]
    pub hadiths: Option<PathBuf>,

    /// Narrator dataset CSV.
    #[arg(long, value_name = "PATH")]
    pub narrators: Option<PathBuf>,

    /// Output directory for the JSON artifacts.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Process only the first N hadiths.
    #[arg(long, value_name = "N")]
    pub max_hadiths: Option<usize>,

    /// Nodes kept in graph.json, ranked by PageRank.
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// PageRank iterations.
    #[arg(long, value_name = "N")]
    pub iterations: Option<usize>,

    /// PageRank damping factor in [0, 1].
    #[arg(long, value_name = "F")]
    pub damping: Option<f64>,

    /// Betweenness source sample size.
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

impl BuildArgs {
    /// Apply command-line overrides on top of file configuration.
    fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(path) = &self.hadiths {
            config.input.hadiths.clone_from(path);
        }
        if let Some(path) = &self.narrators {
            config.input.narrators.clone_from(path);
        }
        if let Some(dir) = &self.out {
            config.export.output_dir.clone_from(dir);
        }
        if let Some(n) = self.max_hadiths {
            config.input.max_hadiths = n;
        }
        if let Some(n) = self.top_n {
            config.export.top_n = n;
        }
        if let Some(n) = self.iterations {
            config.pagerank.iterations = n;
        }
        if let Some(d) = self.damping {
            config.pagerank.damping = d;
        }
        if let Some(n) = self.sample_size {
            config.betweenness.sample_size = n;
        }
        if self.compact {
            config.export.pretty = false;
        }
        config
    }
}

/// Report payload for `isnad build`.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub hadith_rows: usize,
    pub narrator_rows: usize,
    pub processed_hadiths: usize,
    pub malformed_numeric: usize,
    pub malformed_chain_entries: usize,
    pub graph: GraphStats,
    pub metrics: MetricsSummary,
    pub content_hash: String,
    pub exported_nodes: usize,
    pub exported_edges: usize,
    pub output_dir: PathBuf,
    pub files: Vec<WrittenArtifact>,
}

/// Execute `isnad build`.
pub fn run_build(args: &BuildArgs, output: OutputMode, cwd: &Path) -> Result<()> {
    let config = args.apply(super::load_config(args.config.as_deref(), cwd)?);
    config
        .validate()
        .map_err(|e| coded(ErrorCode::InvalidConfigValue, e))?;

    let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { cwd.join(p) };
    let hadiths_path = resolve(&config.input.hadiths);
    let narrators_path = resolve(&config.input.narrators);
    let out_dir = resolve(&config.export.output_dir);

    let records = timed("load", || load_records(&hadiths_path, &narrators_path))
        .map_err(|e| CodedError::new(ErrorCode::InputUnreadable, e.to_string()))?;

    let run = pipeline::run(&records, &config);

    let files = timed("export", || write_all(&out_dir, &run.artifacts, config.export.pretty))
        .map_err(|e| coded(ErrorCode::ArtifactWriteFailed, e))?;

    info!(dir = %out_dir.display(), files = files.len(), "build complete");

    let report = BuildReport {
        hadith_rows: records.report.hadith_rows,
        narrator_rows: records.report.narrator_rows,
        processed_hadiths: run.processed_hadiths,
        malformed_numeric: records.report.malformed_numeric,
        malformed_chain_entries: records.report.malformed_chain_entries,
        content_hash: run.graph.content_hash(),
        exported_nodes: run.artifacts.graph.nodes.len(),
        exported_edges: run.artifacts.graph.edges.len(),
        graph: run.stats,
        metrics: run.metrics,
        output_dir: out_dir,
        files,
    };

    render_mode(output, &report, render_build_text, render_build_pretty)
}

fn render_build_text(r: &BuildReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "hadiths={} processed={} narrators={} nodes={} edges={} density={:.6}",
        r.hadith_rows,
        r.processed_hadiths,
        r.narrator_rows,
        r.graph.node_count,
        r.graph.edge_count,
        r.graph.density
    )?;
    for f in &r.files {
        writeln!(w, "{}\t{}", f.path.display(), f.bytes)?;
    }
    Ok(())
}

fn render_build_pretty(r: &BuildReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Input")?;
    pretty_kv(w, "Hadiths", format!("{} ({} processed)", r.hadith_rows, r.processed_hadiths))?;
    pretty_kv(w, "Narrators", r.narrator_rows.to_string())?;
    if r.malformed_numeric > 0 || r.malformed_chain_entries > 0 {
        pretty_kv(
            w,
            "Recovered",
            format!(
                "{} numeric fields, {} chain entries",
                r.malformed_numeric, r.malformed_chain_entries
            ),
        )?;
    }
    writeln!(w)?;

    pretty_section(w, "Graph")?;
    pretty_kv(w, "Nodes", r.graph.node_count.to_string())?;
    pretty_kv(
        w,
        "Edges",
        format!("{} (weight {})", r.graph.edge_count, r.graph.total_weight),
    )?;
    pretty_kv(w, "Density", format!("{:.6}", r.graph.density))?;
    pretty_kv(w, "Components", r.graph.weakly_connected_components.to_string())?;
    pretty_kv(
        w,
        "Max degree",
        format!("in {} / out {}", r.graph.max_in_degree, r.graph.max_out_degree),
    )?;
    pretty_kv(w, "Unresolved", r.graph.unresolved_nodes.to_string())?;
    pretty_kv(w, "Hash", &r.content_hash)?;
    writeln!(w)?;

    pretty_section(w, "Metrics")?;
    pretty_kv(
        w,
        "PageRank",
        format!(
            "{} iterations, total {:.4}",
            r.metrics.pagerank_iterations, r.metrics.pagerank_total
        ),
    )?;
    pretty_kv(
        w,
        "Betweenness",
        format!(
            "{} sources, scale {:.3}",
            r.metrics.betweenness_sampled, r.metrics.betweenness_scale
        ),
    )?;
    writeln!(w)?;

    pretty_section(w, "Artifacts")?;
    pretty_kv(
        w,
        "Exported",
        format!("{} nodes, {} edges", r.exported_nodes, r.exported_edges),
    )?;
    for f in &r.files {
        writeln!(w, "  {:<16} {:>10} bytes", f.file, f.bytes)?;
    }
    writeln!(w, "  in {}", r.output_dir.display())
}
