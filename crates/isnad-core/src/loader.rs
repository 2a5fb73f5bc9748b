//! CSV record loader.
//!
//! # Overview
//!
//! Reads the two input datasets (hadiths and narrators) into typed records.
//! The CSV header is validated once: required columns must be present,
//! optional columns default to empty text, unknown columns are ignored.
//!
//! ## Failure Model
//!
//! - An unreadable dataset (missing file, I/O failure, missing required
//!   column) is a [`LoadError`] that names the dataset. [`load_records`]
//!   returns nothing unless *both* datasets load.
//! - A malformed numeric field becomes `None` and is counted in the
//!   [`LoadReport`]. The row itself is kept.
//! - A malformed chain entry is dropped from that chain and counted; the
//!   remaining entries keep their order.
//!
//! Rows are never dropped: the record vectors have one entry per data row,
//! in file order.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::model::{HadithRecord, NarratorId, NarratorRecord};

// ---------------------------------------------------------------------------
// Errors and reporting
// ---------------------------------------------------------------------------

/// Which input dataset an error or record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Hadiths,
    Narrators,
}

impl Dataset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hadiths => "hadiths",
            Self::Narrators => "narrators",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal loader errors. Either one aborts the run before any output exists.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The dataset could not be opened or read.
    #[error("{dataset} dataset unreadable ({origin}): {source}")]
    Unreadable {
        dataset: Dataset,
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// The header row lacks a column the pipeline cannot work without.
    #[error("{dataset} dataset ({origin}) is missing required column `{column}`")]
    MissingColumn {
        dataset: Dataset,
        origin: String,
        column: &'static str,
    },
}

impl LoadError {
    /// The dataset that failed to load.
    #[must_use]
    pub const fn dataset(&self) -> Dataset {
        match self {
            Self::Unreadable { dataset, .. } | Self::MissingColumn { dataset, .. } => *dataset,
        }
    }
}

/// Counters for recovered field-level problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub hadith_rows: usize,
    pub narrator_rows: usize,
    /// Non-empty numeric fields that failed to parse (now `None`).
    pub malformed_numeric: usize,
    /// Chain entries dropped because they were not integers.
    pub malformed_chain_entries: usize,
}

/// Both datasets, loaded together.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub hadiths: Vec<HadithRecord>,
    pub narrators: Vec<NarratorRecord>,
    pub report: LoadReport,
}

impl LoadedRecords {
    /// The first `max` hadiths, in file order.
    #[must_use]
    pub fn processed_hadiths(&self, max: usize) -> &[HadithRecord] {
        &self.hadiths[..self.hadiths.len().min(max)]
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Parse an integer field.
///
/// Accepts plain integers and integral floats (`"12.0"`), which spreadsheet
/// exports commonly produce. Blank or unparseable input yields `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_numeric(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15)
        .map(|v| v as i64)
}

/// A transmission chain parsed from its comma-separated column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedChain {
    pub ids: Vec<NarratorId>,
    /// Non-empty entries with no leading integer.
    pub rejected: usize,
}

/// Parse one chain entry by its leading integer.
///
/// An optional sign and the digit run that follows it are kept, anything
/// after the digits is ignored: `"12abc"` is 12, `"4.5"` is 4 and `"1e3"`
/// is 1. Entries that do not start with a digit yield `None`.
#[must_use]
pub fn parse_chain_entry(raw: &str) -> Option<NarratorId> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a comma-separated chain column such as `"12, 7,301"`.
///
/// Each entry is read with [`parse_chain_entry`]. Empty entries are skipped
/// silently, entries with no leading integer are skipped and counted. Order
/// of the surviving entries is preserved.
#[must_use]
pub fn parse_chain(raw: &str) -> ParsedChain {
    let mut chain = ParsedChain::default();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match parse_chain_entry(part) {
            Some(id) => chain.ids.push(id),
            None => chain.rejected += 1,
        }
    }
    chain
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

struct Columns {
    dataset: Dataset,
    origin: String,
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(dataset: Dataset, origin: &str, headers: &ByteRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let name = String::from_utf8_lossy(raw);
                let name = name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
                (name, i)
            })
            .collect();
        Self {
            dataset,
            origin: origin.to_string(),
            index,
        }
    }

    fn require(&self, column: &'static str) -> Result<usize, LoadError> {
        self.index
            .get(column)
            .copied()
            .ok_or_else(|| LoadError::MissingColumn {
                dataset: self.dataset,
                origin: self.origin.clone(),
                column,
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

struct Row<'a> {
    record: &'a ByteRecord,
    dataset: Dataset,
    line: u64,
}

impl Row<'_> {
    fn text(&self, idx: Option<usize>) -> String {
        idx.and_then(|i| self.record.get(i))
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
            .unwrap_or_default()
    }

    fn numeric(&self, idx: Option<usize>, column: &str, report: &mut LoadReport) -> Option<i64> {
        let raw = self.text(idx);
        let parsed = parse_numeric(&raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            report.malformed_numeric += 1;
            warn!(
                dataset = %self.dataset,
                line = self.line,
                column,
                value = raw.as_str(),
                "malformed numeric field, using sentinel"
            );
        }
        parsed
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn unreadable(dataset: Dataset, origin: &str, source: csv::Error) -> LoadError {
    LoadError::Unreadable {
        dataset,
        origin: origin.to_string(),
        source,
    }
}

/// Iterate the data rows of a CSV source, handing each to `f`.
fn for_each_row<R: Read>(
    reader: R,
    dataset: Dataset,
    origin: &str,
    mut f: impl FnMut(&Columns, Row<'_>),
    required: &[&'static str],
) -> Result<(), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr
        .byte_headers()
        .map_err(|e| unreadable(dataset, origin, e))?
        .clone();
    let columns = Columns::from_headers(dataset, origin, &headers);
    for column in required {
        columns.require(column)?;
    }

    let mut record = ByteRecord::new();
    while rdr
        .read_byte_record(&mut record)
        .map_err(|e| unreadable(dataset, origin, e))?
    {
        let line = record.position().map_or(0, csv::Position::line);
        f(
            &columns,
            Row {
                record: &record,
                dataset,
                line,
            },
        );
    }
    Ok(())
}

/// Read narrator records from any CSV source.
///
/// Requires the `scholar_indx` and `name` columns.
///
/// # Errors
///
/// Returns [`LoadError`] if the source cannot be read or lacks a required
/// column.
pub fn read_narrators<R: Read>(
    reader: R,
    origin: &str,
    report: &mut LoadReport,
) -> Result<Vec<NarratorRecord>, LoadError> {
    let mut out = Vec::new();
    for_each_row(
        reader,
        Dataset::Narrators,
        origin,
        |cols, row| {
            let rec = NarratorRecord {
                id: row.numeric(cols.optional("id"), "id", report),
                scholar_indx: row.numeric(cols.optional("scholar_indx"), "scholar_indx", report),
                name: row.text(cols.optional("name")),
                grade: row.text(cols.optional("grade")),
                birth_date_place: row.text(cols.optional("birth_date_place")),
                death_date_place: row.text(cols.optional("death_date_place")),
                birth_place: row.text(cols.optional("birth_place")),
                birth_date: row.text(cols.optional("birth_date")),
                death_date: row.text(cols.optional("death_date")),
                area_of_interest: row.text(cols.optional("area_of_interest")),
            };
            out.push(rec);
        },
        &["scholar_indx", "name"],
    )?;
    report.narrator_rows += out.len();
    Ok(out)
}

/// Read hadith records from any CSV source.
///
/// Requires the `chain_indx` column.
///
/// # Errors
///
/// Returns [`LoadError`] if the source cannot be read or lacks a required
/// column.
pub fn read_hadiths<R: Read>(
    reader: R,
    origin: &str,
    report: &mut LoadReport,
) -> Result<Vec<HadithRecord>, LoadError> {
    let mut out = Vec::new();
    for_each_row(
        reader,
        Dataset::Hadiths,
        origin,
        |cols, row| {
            let parsed = parse_chain(&row.text(cols.optional("chain_indx")));
            if parsed.rejected > 0 {
                report.malformed_chain_entries += parsed.rejected;
                warn!(
                    dataset = %row.dataset,
                    line = row.line,
                    rejected = parsed.rejected,
                    kept = parsed.ids.len(),
                    "dropped malformed chain entries"
                );
            }
            let rec = HadithRecord {
                id: row.numeric(cols.optional("id"), "id", report),
                hadith_id: row.numeric(cols.optional("hadith_id"), "hadith_id", report),
                source: row.text(cols.optional("source")),
                chapter_no: row.text(cols.optional("chapter_no")),
                hadith_no: row.text(cols.optional("hadith_no")),
                chapter: row.text(cols.optional("chapter")),
                chain: parsed.ids,
                text_ar: row.text(cols.optional("text_ar")),
                text_en: row.text(cols.optional("text_en")),
            };
            out.push(rec);
        },
        &["chain_indx"],
    )?;
    report.hadith_rows += out.len();
    Ok(out)
}

fn open(dataset: Dataset, path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| unreadable(dataset, &path.display().to_string(), e.into()))
}

/// Load both datasets from disk.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered. No records are returned
/// unless both datasets load.
#[instrument(fields(hadiths = %hadiths.display(), narrators = %narrators.display()))]
pub fn load_records(hadiths: &Path, narrators: &Path) -> Result<LoadedRecords, LoadError> {
    let mut report = LoadReport::default();

    let narrator_records = read_narrators(
        open(Dataset::Narrators, narrators)?,
        &narrators.display().to_string(),
        &mut report,
    )?;
    let hadith_records = read_hadiths(
        open(Dataset::Hadiths, hadiths)?,
        &hadiths.display().to_string(),
        &mut report,
    )?;

    info!(
        hadiths = report.hadith_rows,
        narrators = report.narrator_rows,
        malformed_numeric = report.malformed_numeric,
        malformed_chain_entries = report.malformed_chain_entries,
        "loaded datasets"
    );

    Ok(LoadedRecords {
        hadiths: hadith_records,
        narrators: narrator_records,
        report,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
