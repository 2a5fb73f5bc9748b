//! `isnad narrator`: one narrator's detail record from `narrators.json`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use isnad_core::{error::ErrorCode, model::NarratorId};
use isnad_graph::export::{NARRATORS_FILE, NarratorDetail, NarratorDetails};

use crate::output::{CodedError, OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `isnad narrator`.
#[derive(Args, Debug)]
pub struct NarratorArgs {
    /// Narrator id (the `scholar_indx` used in chains).
    pub id: NarratorId,

    /// Artifact directory (default: `export.output_dir` from config).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file used to locate the artifact directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Execute `isnad narrator`.
pub fn run_narrator(args: &NarratorArgs, output: OutputMode, cwd: &Path) -> anyhow::Result<()> {
    let dir = super::artifact_dir(args.out.as_deref(), args.config.as_deref(), cwd)?;
    let mut details: NarratorDetails = super::read(&dir, NARRATORS_FILE)?;
    let detail = details.remove(&args.id).ok_or_else(|| {
        CodedError::new(
            ErrorCode::NarratorNotFound,
            format!("no narrator with id {} in {}", args.id, dir.join(NARRATORS_FILE).display()),
        )
    })?;

    render_mode(output, &detail, render_narrator_text, render_narrator_pretty)
}

fn render_narrator_text(d: &NarratorDetail, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}\tpagerank={:.6}\tin={}\tout={}\tbetweenness={:.2}",
        d.id, d.name, d.grade, d.pagerank, d.in_degree, d.out_degree, d.betweenness
    )
}

fn render_narrator_pretty(d: &NarratorDetail, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("{} (#{})", d.name, d.id))?;
    if d.name_arabic != d.name {
        pretty_kv(w, "Arabic", &d.name_arabic)?;
    }
    pretty_kv(w, "Grade", &d.grade)?;
    pretty_kv(w, "Born", &d.birth)?;
    pretty_kv(w, "Died", &d.death)?;
    pretty_kv(w, "Birthplace", &d.birth_place)?;
    pretty_kv(w, "Areas", &d.areas)?;
    writeln!(w)?;
    pretty_kv(w, "PageRank", format!("{:.6}", d.pagerank))?;
    pretty_kv(w, "Received", format!("from {} narrators", d.in_degree))?;
    pretty_kv(w, "Transmitted", format!("to {} narrators", d.out_degree))?;
    pretty_kv(w, "Betweenness", format!("{:.2}", d.betweenness))
}
