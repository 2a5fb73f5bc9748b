use serde::{Deserialize, Serialize};

use super::{NarratorId, is_transmission_chain};

/// One row of the hadith dataset.
///
/// `chain` keeps the narrator order of the source verbatim; consecutive
/// pairs become directed edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithRecord {
    pub id: Option<i64>,
    pub hadith_id: Option<i64>,
    /// Collection name, e.g. `"Sahih Bukhari"`.
    pub source: String,
    pub chapter_no: String,
    pub hadith_no: String,
    pub chapter: String,
    pub chain: Vec<NarratorId>,
    pub text_ar: String,
    pub text_en: String,
}

impl HadithRecord {
    /// Whether the chain adds anything to the graph.
    #[must_use]
    pub fn is_transmission(&self) -> bool {
        is_transmission_chain(&self.chain)
    }
}
