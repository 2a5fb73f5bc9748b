//! Narrator lookup by the identifier transmission chains use.

use std::collections::HashMap;

use isnad_core::model::{NarratorId, NarratorRecord, UNKNOWN, unknown_narrator_name};

use super::build::NodeAttributes;
use super::group::NarratorGroup;

/// Index over the narrator dataset keyed by `scholar_indx`.
///
/// Rows whose `scholar_indx` failed to parse are not reachable. When two
/// rows share an index the later row wins.
#[derive(Debug, Clone, Default)]
pub struct NarratorDirectory<'a> {
    by_id: HashMap<NarratorId, &'a NarratorRecord>,
}

impl<'a> NarratorDirectory<'a> {
    #[must_use]
    pub fn new(records: &'a [NarratorRecord]) -> Self {
        let by_id = records
            .iter()
            .filter_map(|rec| rec.scholar_indx.map(|id| (id, rec)))
            .collect();
        Self { by_id }
    }

    #[must_use]
    pub fn get(&self, id: NarratorId) -> Option<&'a NarratorRecord> {
        self.by_id.get(&id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Record name, or `Unknown (<id>)` when the record is absent or unnamed.
    #[must_use]
    pub fn display_name(&self, id: NarratorId) -> String {
        self.get(id)
            .map(|rec| rec.name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| unknown_narrator_name(id), str::to_string)
    }

    /// Node attributes for a narrator first seen in a chain.
    #[must_use]
    pub fn attributes(&self, id: NarratorId) -> NodeAttributes {
        let record = self.get(id);
        let grade = record
            .map(|rec| rec.grade.trim())
            .filter(|g| !g.is_empty())
            .unwrap_or(UNKNOWN);

        NodeAttributes {
            name: self.display_name(id),
            grade: grade.to_string(),
            group: NarratorGroup::classify(grade),
            resolved: record.is_some(),
        }
    }
}
