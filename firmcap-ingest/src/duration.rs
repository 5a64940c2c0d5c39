//! Duration and timestamp parsing for time-entry exports.
//!
//! Durations come in as plain minutes ("90"), clock form ("1:30") or unit
//! form ("1h 30m", "2h", "45m", "1.5h").

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<h>\d+):(?P<m>[0-5]\d)$").expect("valid clock regex"));

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<h>\d+(?:\.\d+)?)\s*h(?:ours?|rs?)?)?\s*(?:(?P<m>\d+)\s*m(?:in(?:utes?|s)?)?)?$")
        .expect("valid unit regex")
});

/// Parse a duration into whole minutes.
pub fn parse_duration_minutes(raw: &str) -> Result<u32> {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        bail!("empty duration");
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().map_err(|e| anyhow!("invalid minutes '{raw}': {e}"));
    }

    if let Some(caps) = CLOCK_RE.captures(&s) {
        let h: u32 = caps["h"].parse()?;
        let m: u32 = caps["m"].parse()?;
        return h
            .checked_mul(60)
            .and_then(|hm| hm.checked_add(m))
            .ok_or_else(|| anyhow!("duration out of range '{raw}'"));
    }

    if let Some(caps) = UNIT_RE.captures(&s) {
        let hours = caps.name("h").map(|h| h.as_str());
        let mins = caps.name("m").map(|m| m.as_str());
        if hours.is_none() && mins.is_none() {
            bail!("invalid duration '{raw}'");
        }
        let hour_minutes = match hours {
            Some(h) => {
                let m = (h.parse::<f64>()? * 60.0).round();
                if !(m.is_finite() && m <= u32::MAX as f64) {
                    bail!("duration out of range '{raw}'");
                }
                m as u32
            }
            None => 0,
        };
        let minutes = match mins {
            Some(m) => m.parse::<u32>()?,
            None => 0,
        };
        return hour_minutes
            .checked_add(minutes)
            .ok_or_else(|| anyhow!("duration out of range '{raw}'"));
    }

    bail!("invalid duration '{raw}'")
}

/// Parse an RFC 3339 timestamp, or "YYYY-MM-DD HH:MM" local to `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let ndt = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow!("invalid timestamp '{s}': {e}"))?;

    let local = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow!("ambiguous or invalid local time (DST?): {s} {tz}"))?;

    Ok(local.with_timezone(&Utc))
}
