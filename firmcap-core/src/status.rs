//! Firm status classification and bottleneck identification.
//!
//! Both are recomputed from the current snapshots on every call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roles::BucketId;
use crate::utilization::CapacitySnapshot;

/// Utilization above this is over capacity.
pub const OVER_CAPACITY_PCT: f64 = 100.0;

/// Points below a bucket's target where the approaching warning starts.
pub const APPROACHING_MARGIN_PCT: f64 = 5.0;

/// Ordered by severity: `Healthy < ApproachingCapacity < OverCapacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirmStatus {
    Healthy,
    ApproachingCapacity,
    OverCapacity,
}

impl FirmStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FirmStatus::Healthy => "Healthy",
            FirmStatus::ApproachingCapacity => "Approaching capacity",
            FirmStatus::OverCapacity => "Over capacity",
        }
    }
}

impl fmt::Display for FirmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a single bucket. Undefined utilization reads as healthy.
pub fn bucket_status(utilization_pct: Option<f64>, target_utilization_pct: f64) -> FirmStatus {
    match utilization_pct {
        Some(u) if u > OVER_CAPACITY_PCT => FirmStatus::OverCapacity,
        Some(u) if u > target_utilization_pct - APPROACHING_MARGIN_PCT => FirmStatus::ApproachingCapacity,
        _ => FirmStatus::Healthy,
    }
}

/// Most severe bucket status.
pub fn classify(snapshots: &[CapacitySnapshot]) -> FirmStatus {
    snapshots
        .iter()
        .map(|s| bucket_status(s.utilization_pct, s.target_utilization_pct))
        .max()
        .unwrap_or(FirmStatus::Healthy)
}

/// The bucket(s) with the highest defined utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// All buckets tied at the top, in bucket order.
    pub buckets: Vec<BucketId>,
    pub utilization_pct: f64,
}

impl Bottleneck {
    pub fn is_tie(&self) -> bool {
        self.buckets.len() > 1
    }
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.buckets.iter().map(|b| b.label()).collect();
        write!(f, "{} ({:.1}%)", names.join(" + "), self.utilization_pct)
    }
}

/// `None` when no bucket has a defined utilization.
pub fn bottleneck(snapshots: &[CapacitySnapshot]) -> Option<Bottleneck> {
    let top = snapshots
        .iter()
        .filter_map(|s| s.utilization_pct)
        .reduce(f64::max)?;

    let mut buckets: Vec<BucketId> = snapshots
        .iter()
        .filter(|s| s.utilization_pct == Some(top))
        .map(|s| s.bucket)
        .collect();
    buckets.sort();
    buckets.dedup();

    Some(Bottleneck {
        buckets,
        utilization_pct: top,
    })
}
