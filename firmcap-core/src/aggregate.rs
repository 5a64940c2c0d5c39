//! Time aggregation: logged minutes per staffing bucket over a trailing window.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::entry::TimeEntry;
use crate::roles::BucketId;

/// Lookback used by the live-capacity dashboard.
pub const DEFAULT_TRAILING_DAYS: i64 = 30;

/// Longest lookback accepted from a config file.
pub const MAX_TRAILING_DAYS: i64 = 3650;

/// Half-open window: `start < timestamp <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TrailingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` before a single fixed `now`, inclusive of `now`.
    ///
    /// A lookback reaching past the representable range starts at
    /// `DateTime::<Utc>::MIN_UTC`. Negative `days` give an empty window.
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        let start = TimeDelta::try_days(days.max(0))
            .and_then(|d| now.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts > self.start && ts <= self.end
    }
}

/// Hours logged per bucket. Every bucket is present, zero if nothing was logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketHours {
    pub minutes: BTreeMap<BucketId, u64>,
    /// Entries in the window whose tag maps to no bucket.
    pub unmapped_entries: usize,
}

impl Default for BucketHours {
    fn default() -> Self {
        Self {
            minutes: BucketId::ALL.into_iter().map(|b| (b, 0)).collect(),
            unmapped_entries: 0,
        }
    }
}

impl BucketHours {
    pub fn minutes_for(&self, bucket: BucketId) -> u64 {
        self.minutes.get(&bucket).copied().unwrap_or(0)
    }

    pub fn hours_for(&self, bucket: BucketId) -> f64 {
        self.minutes_for(bucket) as f64 / 60.0
    }

    /// Per-bucket hours in bucket order.
    pub fn hours(&self) -> BTreeMap<BucketId, f64> {
        self.minutes
            .iter()
            .map(|(b, m)| (*b, *m as f64 / 60.0))
            .collect()
    }

    /// Sum of the per-bucket hour values, so it always matches the breakdown.
    pub fn total_hours(&self) -> f64 {
        self.hours().values().sum()
    }

    /// Merge totals from a disjoint set of entries.
    pub fn merge(&mut self, other: &BucketHours) {
        for (b, m) in &other.minutes {
            *self.minutes.entry(*b).or_insert(0) += m;
        }
        self.unmapped_entries += other.unmapped_entries;
    }
}

/// Sum entry durations per bucket for entries inside `window`.
///
/// Input order does not matter and unknown role tags are skipped.
pub fn aggregate_hours(entries: &[TimeEntry], window: &TrailingWindow) -> BucketHours {
    let mut out = BucketHours::default();
    let mut in_window = 0usize;

    for e in entries.iter().filter(|e| window.contains(e.timestamp)) {
        in_window += 1;
        match e.bucket() {
            Some(b) => *out.minutes.entry(b).or_insert(0) += e.duration_minutes as u64,
            None => out.unmapped_entries += 1,
        }
    }

    log::debug!(
        "aggregate: {} of {} entries in window, {} unmapped",
        in_window,
        entries.len(),
        out.unmapped_entries
    );
    out
}

/// Aggregate over the default trailing window ending at `now`.
pub fn trailing_hours(entries: &[TimeEntry], now: DateTime<Utc>) -> BucketHours {
    aggregate_hours(entries, &TrailingWindow::last_days(now, DEFAULT_TRAILING_DAYS))
}

/// Hours logged against one charge code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeCodeHours {
    pub charge_code: String,
    pub hours: f64,
    pub entry_count: usize,
}

/// Charge-code breakdown inside `window`, largest first.
///
/// With `bucket` set, only entries counting against that bucket are included.
pub fn hours_by_charge_code(
    entries: &[TimeEntry],
    window: &TrailingWindow,
    bucket: Option<BucketId>,
) -> Vec<ChargeCodeHours> {
    let mut groups: HashMap<&str, (u64, usize)> = HashMap::new();

    for e in entries.iter().filter(|e| window.contains(e.timestamp)) {
        if bucket.is_some() && e.bucket() != bucket {
            continue;
        }
        let slot = groups.entry(e.charge_code.trim()).or_insert((0, 0));
        slot.0 += e.duration_minutes as u64;
        slot.1 += 1;
    }

    let mut rows: Vec<ChargeCodeHours> = groups
        .into_iter()
        .map(|(code, (minutes, count))| ChargeCodeHours {
            charge_code: code.to_string(),
            hours: minutes as f64 / 60.0,
            entry_count: count,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.hours
            .total_cmp(&a.hours)
            .then_with(|| a.charge_code.cmp(&b.charge_code))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 31, 17, 0, 0).unwrap()
    }

    fn entry(id: &str, cat: &str, minutes: u32, days_ago: i64) -> TimeEntry {
        TimeEntry::new(id, cat, minutes, now() - Duration::days(days_ago))
    }

    fn sample() -> Vec<TimeEntry> {
        vec![
            entry("1", "advisor", 90, 1).with_charge_code("Planning"),
            entry("2", "support", 45, 2).with_charge_code("Onboarding"),
            entry("3", "advisor", 30, 10).with_charge_code("Planning"),
            entry("4", "tax_preparer", 120, 5).with_charge_code("1040 prep"),
            entry("5", "tax reviewer", 60, 6).with_charge_code("1040 review"),
            entry("6", "marketing", 300, 3).with_charge_code("Webinar"),
            entry("7", "support", 0, 4).with_charge_code("Onboarding"),
            entry("8", "advisor", 600, 45).with_charge_code("Planning"),
        ]
    }

    #[test]
    fn test_aggregate_by_bucket() {
        let totals = trailing_hours(&sample(), now());

        assert_eq!(totals.minutes_for(BucketId::Advisors), 120);
        assert_eq!(totals.minutes_for(BucketId::Support), 45);
        assert_eq!(totals.minutes_for(BucketId::Tax), 180);
        assert_eq!(totals.hours_for(BucketId::Advisors), 2.0);
        assert_eq!(totals.hours_for(BucketId::Tax), 3.0);
        assert_eq!(totals.unmapped_entries, 1);
    }

    #[test]
    fn test_total_is_sum_of_buckets() {
        let totals = trailing_hours(&sample(), now());
        let summed: f64 = totals.hours().values().sum();
        assert_eq!(totals.total_hours(), summed);
        assert!((totals.total_hours() - 5.75).abs() < 1e-9);
    }

    #[test]
    fn test_unmapped_category_contributes_nothing() {
        let entries = vec![entry("x", "marketing", 500, 1), entry("y", "admin", 200, 1)];
        let totals = trailing_hours(&entries, now());
        assert_eq!(totals.total_hours(), 0.0);
        assert_eq!(totals.unmapped_entries, 2);
        assert_eq!(totals.minutes.len(), BucketId::ALL.len());
    }

    #[test]
    fn test_window_boundaries() {
        let w = TrailingWindow::last_days(now(), 30);
        // strictly after start
        assert!(!w.contains(now() - Duration::days(30)));
        assert!(w.contains(now() - Duration::days(30) + Duration::seconds(1)));
        // inclusive of now, nothing after it
        assert!(w.contains(now()));
        assert!(!w.contains(now() + Duration::seconds(1)));
    }

    #[test]
    fn test_huge_lookback_saturates() {
        for days in [100_000_000, i64::MAX] {
            let w = TrailingWindow::last_days(now(), days);
            assert_eq!(w.start, DateTime::<Utc>::MIN_UTC);
            assert_eq!(w.end, now());
        }
        let entries = vec![entry("a", "advisor", 60, 4000)];
        let hours = aggregate_hours(&entries, &TrailingWindow::last_days(now(), i64::MAX));
        assert_eq!(hours.minutes_for(BucketId::Advisors), 60);

        let w = TrailingWindow::last_days(now(), -5);
        assert_eq!(w.start, now());
        assert!(!w.contains(now()));
    }

    #[test]
    fn test_partition_additivity() {
        let all = sample();
        let (left, right): (Vec<_>, Vec<_>) =
            all.iter().cloned().partition(|e| e.id.parse::<u32>().unwrap() % 2 == 0);

        let w = TrailingWindow::last_days(now(), 30);
        let mut merged = aggregate_hours(&left, &w);
        merged.merge(&aggregate_hours(&right, &w));

        let whole = aggregate_hours(&all, &w);
        assert_eq!(merged.minutes, whole.minutes);
        assert_eq!(merged.unmapped_entries, whole.unmapped_entries);
    }

    #[test]
    fn test_aggregate_ignores_order_and_is_repeatable() {
        let mut entries = sample();
        let w = TrailingWindow::last_days(now(), 30);
        let first = aggregate_hours(&entries, &w);
        entries.reverse();
        let second = aggregate_hours(&entries, &w);
        assert_eq!(first, second);
        assert_eq!(first.total_hours().to_bits(), second.total_hours().to_bits());
    }

    #[test]
    fn test_charge_code_breakdown() {
        let w = TrailingWindow::last_days(now(), 30);
        let rows = hours_by_charge_code(&sample(), &w, None);

        assert_eq!(rows[0].charge_code, "Webinar");
        assert_eq!(rows[0].hours, 5.0);

        let planning = rows.iter().find(|r| r.charge_code == "Planning").unwrap();
        assert_eq!(planning.entry_count, 2);
        assert_eq!(planning.hours, 2.0);

        let support_only = hours_by_charge_code(&sample(), &w, Some(BucketId::Support));
        assert_eq!(support_only.len(), 1);
        assert_eq!(support_only[0].charge_code, "Onboarding");
        assert_eq!(support_only[0].entry_count, 2);
    }
}
