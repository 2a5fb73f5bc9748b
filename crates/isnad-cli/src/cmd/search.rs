//! `isnad search`: substring search over `hadiths.json`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use isnad_graph::export::{HADITHS_FILE, HadithEntry, search::DEFAULT_LIMIT, search_hadiths};
use serde::Serialize;

use crate::output::{OutputMode, Renderable, render_list};

/// Arguments for `isnad search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to find in English text, Arabic text, or collection name.
    /// Empty lists sample hadiths.
    #[arg(default_value = "")]
    pub query: String,

    /// Maximum number of results.
    #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Artifact directory (default: `export.output_dir` from config).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file used to locate the artifact directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// One search result row.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Hit<'a>(&'a HadithEntry);

impl Hit<'_> {
    fn reference(&self) -> String {
        let h = self.0;
        match (h.hadith_no.trim(), h.chapter_no.trim()) {
            ("", _) => h.source.clone(),
            (no, "") => format!("{} #{no}", h.source),
            (no, ch) => format!("{} {ch}:{no}", h.source),
        }
    }
}

impl Renderable for Hit<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let h = self.0;
        writeln!(w, "{}", self.reference())?;
        if !h.chapter.trim().is_empty() {
            writeln!(w, "  {}", h.chapter.trim())?;
        }
        if !h.narrator_names.is_empty() {
            writeln!(w, "  chain: {}", h.narrator_names.join(" → "))?;
        }
        if !h.text_en.trim().is_empty() {
            writeln!(w, "  {}", excerpt(&h.text_en, 160))?;
        }
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let h = self.0;
        let id = h.id.map_or_else(String::new, |id| id.to_string());
        writeln!(w, "{id}\t{}\t{}", self.reference(), excerpt(&h.text_en, 80))
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "reference", "text"]
    }
}

/// First `max` characters of `text` on one line.
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

/// Execute `isnad search`.
pub fn run_search(args: &SearchArgs, output: OutputMode, cwd: &Path) -> anyhow::Result<()> {
    let dir = super::artifact_dir(args.out.as_deref(), args.config.as_deref(), cwd)?;
    let index: Vec<HadithEntry> = super::read(&dir, HADITHS_FILE)?;

    let hits: Vec<Hit<'_>> = search_hadiths(&index, &args.query, args.limit)
        .into_iter()
        .map(Hit)
        .collect();
    tracing::debug!(query = %args.query, hits = hits.len(), "search finished");

    render_list(&hits, output)
}
