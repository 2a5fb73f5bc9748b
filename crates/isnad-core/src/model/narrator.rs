use serde::{Deserialize, Serialize};

use super::{NarratorId, UNKNOWN};

/// One row of the narrator (rawi) dataset.
///
/// Numeric columns that fail to parse are `None`. Text columns that are
/// absent from the source are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarratorRecord {
    /// Row identifier of the narrator dataset.
    pub id: Option<i64>,
    /// Scholar index; the identifier transmission chains refer to.
    pub scholar_indx: Option<NarratorId>,
    pub name: String,
    /// Free-text reliability grade, e.g. `"Thiqah (trustworthy)"`.
    pub grade: String,
    pub birth_date_place: String,
    pub death_date_place: String,
    pub birth_place: String,
    pub birth_date: String,
    pub death_date: String,
    pub area_of_interest: String,
}

impl NarratorRecord {
    /// Birth as shown in narrator details: the bare date when present,
    /// otherwise the combined date/place column.
    #[must_use]
    pub fn birth(&self) -> &str {
        first_present(&[&self.birth_date, &self.birth_date_place])
    }

    /// Death as shown in narrator details, with the same fallback as
    /// [`Self::birth`].
    #[must_use]
    pub fn death(&self) -> &str {
        first_present(&[&self.death_date, &self.death_date_place])
    }

    #[must_use]
    pub fn birth_place_or_unknown(&self) -> &str {
        first_present(&[&self.birth_place])
    }

    #[must_use]
    pub fn areas_or_unknown(&self) -> &str {
        first_present(&[&self.area_of_interest])
    }
}

fn first_present<'a>(candidates: &[&'a String]) -> &'a str {
    candidates
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_prefers_bare_date() {
        let rec = NarratorRecord {
            birth_date: "94 AH".into(),
            birth_date_place: "94 AH, Madinah".into(),
            ..NarratorRecord::default()
        };
        assert_eq!(rec.birth(), "94 AH");
    }

    #[test]
    fn death_falls_back_to_date_place_then_unknown() {
        let mut rec = NarratorRecord {
            death_date_place: "179 AH, Madinah".into(),
            ..NarratorRecord::default()
        };
        assert_eq!(rec.death(), "179 AH, Madinah");

        rec.death_date_place = "   ".into();
        assert_eq!(rec.death(), UNKNOWN);
    }

    #[test]
    fn missing_place_and_areas_are_unknown() {
        let rec = NarratorRecord::default();
        assert_eq!(rec.birth_place_or_unknown(), UNKNOWN);
        assert_eq!(rec.areas_or_unknown(), UNKNOWN);
    }
}
