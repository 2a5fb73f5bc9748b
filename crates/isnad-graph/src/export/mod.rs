//! Artifact selection and JSON export.
//!
//! [`artifacts`] derives the four artifact values from a graph with computed
//! metrics, [`writer`] puts them on disk, and [`search`] queries a loaded
//! hadith index.

pub mod artifacts;
pub mod search;
pub mod writer;

pub use artifacts::{
    Artifacts, GraphArtifact, GraphEdgeEntry, GraphNodeEntry, GraphSummary, HadithEntry,
    NarratorDetail, NarratorDetails, StatsArtifact, TopBetweenness, TopCitations, TopPageRank,
};
pub use search::search_hadiths;
pub use writer::{
    ExportError, GRAPH_FILE, HADITHS_FILE, NARRATORS_FILE, STATS_FILE, WrittenArtifact,
    read_artifact, write_all,
};
