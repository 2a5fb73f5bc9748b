//! The four JSON artifacts and how they are derived from a finished graph.
//!
//! | file             | contents                                         | cut   |
//! |------------------|--------------------------------------------------|-------|
//! | `graph.json`     | top-N nodes by PageRank and the edges among them | top-N |
//! | `narrators.json` | detail record for every node, keyed by id        | none  |
//! | `hadiths.json`   | every processed hadith with resolved names       | none  |
//! | `stats.json`     | counts, density and three leaderboards           | top-K |
//!
//! Rankings sort by score descending with a stable sort, so ties keep node
//! insertion order.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashSet};

use isnad_core::model::{HadithRecord, NarratorId, NarratorRecord, UNKNOWN};
use serde::{Deserialize, Serialize};

use crate::graph::{IsnadGraph, NarratorDirectory, NarratorNode, density};

// ---------------------------------------------------------------------------
// graph.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeEntry {
    pub id: NarratorId,
    pub name: String,
    pub grade: String,
    pub pagerank: f64,
    pub in_degree: usize,
    /// Group code, see [`crate::graph::NarratorGroup::code`].
    pub group: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdgeEntry {
    pub source: NarratorId,
    pub target: NarratorId,
    pub weight: u32,
}

/// The visualization subgraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub nodes: Vec<GraphNodeEntry>,
    pub edges: Vec<GraphEdgeEntry>,
}

/// Keep the `top_n` nodes by PageRank and the edges whose endpoints both
/// survive.
#[must_use]
pub fn graph_artifact(g: &IsnadGraph, top_n: usize) -> GraphArtifact {
    let top = ranked_by(g, |n| n.metrics.pagerank);
    let nodes: Vec<GraphNodeEntry> = top
        .into_iter()
        .take(top_n)
        .map(|n| GraphNodeEntry {
            id: n.id,
            name: n.name.clone(),
            grade: n.grade.clone(),
            pagerank: n.metrics.pagerank,
            in_degree: n.metrics.in_degree,
            group: n.group.code(),
        })
        .collect();

    let kept: HashSet<NarratorId> = nodes.iter().map(|n| n.id).collect();
    let edges = g
        .edges()
        .filter(|(source, target, _)| kept.contains(source) && kept.contains(target))
        .map(|(source, target, weight)| GraphEdgeEntry {
            source,
            target,
            weight,
        })
        .collect();

    GraphArtifact { nodes, edges }
}

// ---------------------------------------------------------------------------
// narrators.json
// ---------------------------------------------------------------------------

/// Everything shown in the narrator side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorDetail {
    pub id: NarratorId,
    pub name: String,
    pub name_arabic: String,
    pub grade: String,
    pub birth: String,
    pub death: String,
    pub birth_place: String,
    pub areas: String,
    pub pagerank: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub betweenness: f64,
}

/// Narrator details keyed by id. JSON object keys are the stringified ids.
pub type NarratorDetails = BTreeMap<NarratorId, NarratorDetail>;

/// Detail records for every node in the graph, not only the top-N.
#[must_use]
pub fn narrator_details(g: &IsnadGraph, directory: &NarratorDirectory<'_>) -> NarratorDetails {
    g.nodes()
        .map(|node| (node.id, narrator_detail(node, directory)))
        .collect()
}

fn narrator_detail(node: &NarratorNode, directory: &NarratorDirectory<'_>) -> NarratorDetail {
    let record = directory.get(node.id);
    let from_record = |f: fn(&NarratorRecord) -> &str| record.map_or(UNKNOWN, f).to_string();
    let name_arabic = record
        .map(|rec| rec.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(node.name.as_str())
        .to_string();

    NarratorDetail {
        id: node.id,
        name: node.name.clone(),
        name_arabic,
        grade: node.grade.clone(),
        birth: from_record(|r| r.birth()),
        death: from_record(|r| r.death()),
        birth_place: from_record(|r| r.birth_place_or_unknown()),
        areas: from_record(|r| r.areas_or_unknown()),
        pagerank: node.metrics.pagerank,
        in_degree: node.metrics.in_degree,
        out_degree: node.metrics.out_degree,
        betweenness: node.metrics.betweenness,
    }
}

// ---------------------------------------------------------------------------
// hadiths.json
// ---------------------------------------------------------------------------

/// One searchable hadith with its chain resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithEntry {
    pub id: Option<i64>,
    pub hadith_id: Option<i64>,
    pub source: String,
    pub chapter: String,
    pub chapter_no: String,
    pub hadith_no: String,
    pub text_ar: String,
    pub text_en: String,
    pub chain: Vec<NarratorId>,
    pub narrator_names: Vec<String>,
}

/// Index every processed hadith, including those whose chain was too short
/// to contribute edges.
#[must_use]
pub fn hadith_index(hadiths: &[HadithRecord], directory: &NarratorDirectory<'_>) -> Vec<HadithEntry> {
    hadiths
        .iter()
        .map(|h| HadithEntry {
            id: h.id,
            hadith_id: h.hadith_id,
            source: h.source.clone(),
            chapter: h.chapter.clone(),
            chapter_no: h.chapter_no.clone(),
            hadith_no: h.hadith_no.clone(),
            text_ar: h.text_ar.clone(),
            text_en: h.text_en.clone(),
            chain: h.chain.clone(),
            narrator_names: h.chain.iter().map(|&id| directory.display_name(id)).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// stats.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPageRank {
    pub id: NarratorId,
    pub name: String,
    pub grade: String,
    pub pagerank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBetweenness {
    pub id: NarratorId,
    pub name: String,
    pub grade: String,
    pub betweenness: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCitations {
    pub id: NarratorId,
    pub name: String,
    pub grade: String,
    /// In-degree: distinct narrators this one received from.
    pub citations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsArtifact {
    pub graph: GraphSummary,
    pub top_pagerank: Vec<TopPageRank>,
    pub top_betweenness: Vec<TopBetweenness>,
    pub top_citations: Vec<TopCitations>,
}

/// Counts, density and the three leaderboards of `list_len` entries.
#[must_use]
pub fn stats_artifact(g: &IsnadGraph, list_len: usize) -> StatsArtifact {
    let top_pagerank = ranked_by(g, |n| n.metrics.pagerank)
        .into_iter()
        .take(list_len)
        .map(|n| TopPageRank {
            id: n.id,
            name: n.name.clone(),
            grade: n.grade.clone(),
            pagerank: n.metrics.pagerank,
        })
        .collect();

    let top_betweenness = ranked_by(g, |n| n.metrics.betweenness)
        .into_iter()
        .take(list_len)
        .map(|n| TopBetweenness {
            id: n.id,
            name: n.name.clone(),
            grade: n.grade.clone(),
            betweenness: n.metrics.betweenness,
        })
        .collect();

    let mut by_citations: Vec<&NarratorNode> = g.nodes().collect();
    by_citations.sort_by(|a, b| b.metrics.in_degree.cmp(&a.metrics.in_degree));
    let top_citations = by_citations
        .into_iter()
        .take(list_len)
        .map(|n| TopCitations {
            id: n.id,
            name: n.name.clone(),
            grade: n.grade.clone(),
            citations: n.metrics.in_degree,
        })
        .collect();

    StatsArtifact {
        graph: GraphSummary {
            nodes: g.node_count(),
            edges: g.edge_count(),
            density: density(g.node_count(), g.edge_count()),
        },
        top_pagerank,
        top_betweenness,
        top_citations,
    }
}

/// Nodes sorted by `score` descending. `sort_by` is stable, so equal scores
/// keep insertion order.
fn ranked_by(g: &IsnadGraph, score: impl Fn(&NarratorNode) -> f64) -> Vec<&NarratorNode> {
    let mut nodes: Vec<&NarratorNode> = g.nodes().collect();
    nodes.sort_by(|a, b| score(b).total_cmp(&score(a)));
    nodes
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// All four artifacts of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub graph: GraphArtifact,
    pub narrators: NarratorDetails,
    pub hadiths: Vec<HadithEntry>,
    pub stats: StatsArtifact,
}

impl Artifacts {
    /// Derive every artifact from a graph whose metrics are computed.
    #[must_use]
    pub fn collect(
        g: &IsnadGraph,
        directory: &NarratorDirectory<'_>,
        hadiths: &[HadithRecord],
        top_n: usize,
        top_list_len: usize,
    ) -> Self {
        Self {
            graph: graph_artifact(g, top_n),
            narrators: narrator_details(g, directory),
            hadiths: hadith_index(hadiths, directory),
            stats: stats_artifact(g, top_list_len),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
