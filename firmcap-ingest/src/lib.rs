//! firmcap-ingest: time-entry export readers (CSV) and field parsers.

pub mod csv_entries;
pub mod duration;

pub use csv_entries::{parse_entries_csv, read_entries, EntryImport};
pub use duration::{parse_duration_minutes, parse_timestamp};
