//! Visual grouping of narrators by reliability grade.
//!
//! The group only drives node colouring in the front-end; no metric reads
//! it. Classification inspects the free-text grade case-insensitively and
//! the first matching rule wins:
//!
//! | grade contains          | group |
//! |-------------------------|-------|
//! | `thiqah` or `comp`      | 2     |
//! | `hasan`                 | 1     |
//! | `rasool` or `prophet`   | 0     |
//! | anything else           | 3     |

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NarratorGroup {
    Prophet,
    Hasan,
    /// Trustworthy narrators and companions.
    Reliable,
    Unclassified,
}

impl NarratorGroup {
    /// Classify a reliability grade.
    #[must_use]
    pub fn classify(grade: &str) -> Self {
        let grade = grade.to_lowercase();
        if grade.contains("thiqah") || grade.contains("comp") {
            Self::Reliable
        } else if grade.contains("hasan") {
            Self::Hasan
        } else if grade.contains("rasool") || grade.contains("prophet") {
            Self::Prophet
        } else {
            Self::Unclassified
        }
    }

    /// Numeric code written to `graph.json`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Prophet => 0,
            Self::Hasan => 1,
            Self::Reliable => 2,
            Self::Unclassified => 3,
        }
    }
}

impl Serialize for NarratorGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}
