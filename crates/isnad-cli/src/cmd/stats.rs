//! `isnad stats`: network summary and leaderboards from `stats.json`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use isnad_graph::export::{STATS_FILE, StatsArtifact};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `isnad stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Artifact directory (default: `export.output_dir` from config).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file used to locate the artifact directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Execute `isnad stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode, cwd: &Path) -> anyhow::Result<()> {
    let dir = super::artifact_dir(args.out.as_deref(), args.config.as_deref(), cwd)?;
    let stats: StatsArtifact = super::read(&dir, STATS_FILE)?;
    render_mode(output, &stats, render_stats_text, render_stats_pretty)
}

fn render_stats_text(s: &StatsArtifact, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} density={:.6}",
        s.graph.nodes, s.graph.edges, s.graph.density
    )?;
    writeln!(w, "list\trank\tid\tname\tgrade\tvalue")?;
    for (i, e) in s.top_pagerank.iter().enumerate() {
        writeln!(w, "pagerank\t{}\t{}\t{}\t{}\t{:.6}", i + 1, e.id, e.name, e.grade, e.pagerank)?;
    }
    for (i, e) in s.top_betweenness.iter().enumerate() {
        writeln!(
            w,
            "betweenness\t{}\t{}\t{}\t{}\t{:.2}",
            i + 1,
            e.id,
            e.name,
            e.grade,
            e.betweenness
        )?;
    }
    for (i, e) in s.top_citations.iter().enumerate() {
        writeln!(w, "citations\t{}\t{}\t{}\t{}\t{}", i + 1, e.id, e.name, e.grade, e.citations)?;
    }
    Ok(())
}

fn render_stats_pretty(s: &StatsArtifact, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Network")?;
    pretty_kv(w, "Narrators", s.graph.nodes.to_string())?;
    pretty_kv(w, "Links", s.graph.edges.to_string())?;
    pretty_kv(w, "Density", format!("{:.6}", s.graph.density))?;

    writeln!(w)?;
    pretty_section(w, "Most influential (PageRank)")?;
    for (i, e) in s.top_pagerank.iter().enumerate() {
        writeln!(w, "{:>3}. {:<40} {:>10.6}  {}", i + 1, e.name, e.pagerank, e.grade)?;
    }

    writeln!(w)?;
    pretty_section(w, "Bridges (betweenness)")?;
    for (i, e) in s.top_betweenness.iter().enumerate() {
        writeln!(w, "{:>3}. {:<40} {:>10.1}  {}", i + 1, e.name, e.betweenness, e.grade)?;
    }

    writeln!(w)?;
    pretty_section(w, "Most cited (in-degree)")?;
    for (i, e) in s.top_citations.iter().enumerate() {
        writeln!(w, "{:>3}. {:<40} {:>10}  {}", i + 1, e.name, e.citations, e.grade)?;
    }
    Ok(())
}
