//! Writing artifacts to disk and reading them back.
//!
//! Each file is serialized to a sibling `*.json.tmp` and renamed into place,
//! so a reader never sees a half-written artifact.

#![allow(clippy::module_name_repetitions)]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use super::artifacts::Artifacts;

pub const GRAPH_FILE: &str = "graph.json";
pub const NARRATORS_FILE: &str = "narrators.json";
pub const HADITHS_FILE: &str = "hadiths.json";
pub const STATS_FILE: &str = "stats.json";

/// Errors from reading or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {file}")]
    Serialize {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    /// Whether a read failed because the artifact does not exist yet.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// One file produced by [`write_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifact {
    pub file: &'static str,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Serialize `value` to `dir/file`, replacing any previous file atomically.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization, the temp write or the rename
/// fails.
pub fn write_artifact<T: Serialize>(
    dir: &Path,
    file: &'static str,
    value: &T,
    pretty: bool,
) -> Result<WrittenArtifact, ExportError> {
    let body = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|source| ExportError::Serialize { file, source })?;

    let path = dir.join(file);
    let tmp_path = path.with_extension("json.tmp");

    fs::write(&tmp_path, &body).map_err(|source| ExportError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&tmp_path, &path) {
        // Report the rename error; a failed cleanup is ignored.
        let _ = fs::remove_file(&tmp_path);
        return Err(ExportError::Write { path, source });
    }

    debug!(file, bytes = body.len(), "artifact written");
    Ok(WrittenArtifact {
        file,
        path,
        bytes: body.len(),
    })
}

/// Write all four artifacts into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns the first [`ExportError`] encountered. Files written before the
/// failure are left in place.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn write_all(
    dir: &Path,
    artifacts: &Artifacts,
    pretty: bool,
) -> Result<Vec<WrittenArtifact>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let written = vec![
        write_artifact(dir, GRAPH_FILE, &artifacts.graph, pretty)?,
        write_artifact(dir, NARRATORS_FILE, &artifacts.narrators, pretty)?,
        write_artifact(dir, HADITHS_FILE, &artifacts.hadiths, pretty)?,
        write_artifact(dir, STATS_FILE, &artifacts.stats, pretty)?,
    ];

    info!(
        graph_nodes = artifacts.graph.nodes.len(),
        graph_edges = artifacts.graph.edges.len(),
        narrators = artifacts.narrators.len(),
        hadiths = artifacts.hadiths.len(),
        "artifacts exported"
    );
    Ok(written)
}

/// Read a previously written artifact.
///
/// # Errors
///
/// Returns [`ExportError::Read`] if the file cannot be read (see
/// [`ExportError::is_missing`]) or [`ExportError::Parse`] if it is not the
/// expected JSON shape.
pub fn read_artifact<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ExportError> {
    let path = dir.join(file);
    let bytes = fs::read(&path).map_err(|source| ExportError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ExportError::Parse { path, source })
}
