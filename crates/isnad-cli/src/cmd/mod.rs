pub mod build;
pub mod completions;
pub mod narrator;
pub mod search;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::Result;
use isnad_core::{
    config::{PipelineConfig, load_pipeline_config},
    error::ErrorCode,
};
use isnad_graph::export::{ExportError, read_artifact};
use serde::de::DeserializeOwned;

use crate::output::coded;

/// Load configuration, tagging failures as config parse errors.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<PipelineConfig> {
    load_pipeline_config(explicit, cwd).map_err(|e| coded(ErrorCode::ConfigParseError, e))
}

/// Artifact directory for the read-only commands: `--out` if given,
/// otherwise `export.output_dir` from the configuration.
pub fn artifact_dir(out: Option<&Path>, config: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => load_config(config, cwd)?.export.output_dir,
    };
    Ok(if dir.is_absolute() { dir } else { cwd.join(dir) })
}

/// Read an artifact, mapping a missing file to `E1003`.
pub fn read<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    read_artifact(dir, file).map_err(|e: ExportError| {
        let code = if e.is_missing() {
            ErrorCode::ArtifactMissing
        } else {
            ErrorCode::InternalUnexpected
        };
        coded(code, e)
    })
}
