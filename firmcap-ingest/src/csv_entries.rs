//! Read time-entry CSV exports from the Time Entry Store.
//!
//! Expected header (any column order, names case-insensitive):
//! id,charge_code,category,duration,timestamp,notes,user_email
//!
//! `notes` and `user_email` are optional columns. `duration_minutes` is
//! accepted as an alias for `duration`.

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use firmcap_core::TimeEntry;
use std::io::Read;
use std::path::Path;

use crate::duration::{parse_duration_minutes, parse_timestamp};

/// Parsed entries plus the rows that could not be read.
#[derive(Debug, Clone, Default)]
pub struct EntryImport {
    pub entries: Vec<TimeEntry>,
    /// (1-based data row, reason)
    pub skipped: Vec<(usize, String)>,
}

struct Columns {
    id: usize,
    charge_code: usize,
    category: usize,
    duration: usize,
    timestamp: usize,
    notes: Option<usize>,
    user_email: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let need = |names: &[&str]| {
            find(names).with_context(|| format!("missing column '{}'", names[0]))
        };

        Ok(Self {
            id: need(&["id"])?,
            charge_code: need(&["charge_code", "chargecode"])?,
            category: need(&["category"])?,
            duration: need(&["duration", "duration_minutes"])?,
            timestamp: need(&["timestamp"])?,
            notes: find(&["notes"]),
            user_email: find(&["user_email", "useremail"]),
        })
    }
}

fn optional(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn parse_row(record: &csv::StringRecord, cols: &Columns, tz: Tz) -> Result<TimeEntry> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let id = field(cols.id);
    if id.is_empty() {
        bail!("empty id");
    }
    let duration_minutes = parse_duration_minutes(field(cols.duration))?;
    let timestamp = parse_timestamp(field(cols.timestamp), tz)?;

    Ok(TimeEntry {
        id: id.to_string(),
        charge_code: field(cols.charge_code).to_string(),
        category: field(cols.category).to_string(),
        duration_minutes,
        timestamp,
        notes: optional(record, cols.notes),
        user_email: optional(record, cols.user_email),
    })
}

/// Parse entries from any reader. Bad rows are skipped and reported.
pub fn read_entries<R: Read>(reader: R, tz: Tz) -> Result<EntryImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let header = rdr.headers().context("reading header row")?.clone();
    let cols = Columns::from_header(&header)?;

    let mut out = EntryImport::default();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("reading row {row}"))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        match parse_row(&record, &cols, tz) {
            Ok(entry) => out.entries.push(entry),
            Err(e) => {
                log::warn!("skipping time entry row {row}: {e:#}");
                out.skipped.push((row, format!("{e:#}")));
            }
        }
    }

    log::debug!(
        "read {} time entries ({} skipped)",
        out.entries.len(),
        out.skipped.len()
    );
    Ok(out)
}

/// Parse a time-entry CSV file.
pub fn parse_entries_csv(path: impl AsRef<Path>, tz: Tz) -> Result<EntryImport> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    read_entries(file, tz)
}
