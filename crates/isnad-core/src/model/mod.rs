//! Typed input records.
//!
//! Both record kinds are produced exactly once by [`crate::loader`] and are
//! never mutated afterwards.

pub mod hadith;
pub mod narrator;

pub use hadith::HadithRecord;
pub use narrator::NarratorRecord;

/// Identifier shared by narrator records and transmission-chain entries.
pub type NarratorId = i64;

/// Placeholder used wherever a biographical field or grade is missing.
pub const UNKNOWN: &str = "Unknown";

/// A chain of fewer than two narrators records no transmission step.
#[must_use]
pub const fn is_transmission_chain(chain: &[NarratorId]) -> bool {
    chain.len() >= 2
}

/// Display name synthesized for a narrator id with no matching record.
#[must_use]
pub fn unknown_narrator_name(id: NarratorId) -> String {
    format!("Unknown ({id})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmission_needs_two_entries() {
        assert!(!is_transmission_chain(&[]));
        assert!(!is_transmission_chain(&[3]));
        assert!(is_transmission_chain(&[3, 3]));
    }

    #[test]
    fn unknown_name_embeds_id() {
        assert_eq!(unknown_narrator_name(42), "Unknown (42)");
        assert_eq!(unknown_narrator_name(-3), "Unknown (-3)");
    }
}
