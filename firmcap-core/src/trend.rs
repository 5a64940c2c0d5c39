//! Weekly trend of logged hours per bucket.
//!
//! Week boundaries are calendar weeks (Monday start) in the firm's timezone,
//! all derived from one `now` supplied by the caller.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::aggregate::BucketHours;
use crate::entry::TimeEntry;

/// Longest trend a single call will build.
pub const MAX_TREND_WEEKS: usize = 520;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekHours {
    /// Local Monday the week starts on.
    pub week_start: NaiveDate,
    pub hours: BucketHours,
}

/// Monday of the local week containing `now`.
pub fn week_start(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    let local = now.with_timezone(&tz).date_naive();
    local
        .checked_sub_days(Days::new(local.weekday().num_days_from_monday() as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Hours per bucket for the last `weeks` calendar weeks, oldest first.
///
/// The current (partial) week is the last element. Entries stamped after
/// `now` are excluded. `weeks` is capped at [`MAX_TREND_WEEKS`]; a range
/// reaching past the earliest representable date starts at `NaiveDate::MIN`.
pub fn weekly_trend(entries: &[TimeEntry], now: DateTime<Utc>, weeks: usize, tz: Tz) -> Vec<WeekHours> {
    if weeks == 0 {
        return Vec::new();
    }
    if weeks > MAX_TREND_WEEKS {
        log::debug!("weekly trend capped at {MAX_TREND_WEEKS} weeks (asked for {weeks})");
    }
    let weeks = weeks.min(MAX_TREND_WEEKS);

    let current = week_start(now, tz);
    let first = TimeDelta::try_weeks(weeks as i64 - 1)
        .and_then(|d| current.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN);

    let mut out: Vec<WeekHours> = (0..weeks)
        .map_while(|i| {
            let start = first.checked_add_signed(TimeDelta::try_weeks(i as i64)?)?;
            Some(WeekHours {
                week_start: start,
                hours: BucketHours::default(),
            })
        })
        .collect();

    for e in entries.iter().filter(|e| e.timestamp <= now) {
        let day = e.timestamp.with_timezone(&tz).date_naive();
        if day < first {
            continue;
        }
        let idx = ((day - first).num_days() / 7) as usize;
        let Some(slot) = out.get_mut(idx) else {
            continue;
        };
        match e.bucket() {
            Some(b) => *slot.hours.minutes.entry(b).or_insert(0) += e.duration_minutes as u64,
            None => slot.hours.unmapped_entries += 1,
        }
    }

    out
}
