//! Utilization and client-capacity sizing.
//!
//! Anything that divides by capacity or by hours-per-client returns `None`
//! when the divisor is not positive. Callers show that as "N/A".

use serde::{Deserialize, Serialize};

use crate::roles::BucketId;

/// Target used when a bucket is sized without a utilization cap.
pub const UNCAPPED_TARGET_PCT: f64 = 100.0;

pub fn total_capacity_hours(headcount: u32, capacity_per_head: f64) -> f64 {
    headcount as f64 * capacity_per_head
}

/// `100 * hours / total_capacity_hours`, not clamped.
///
/// `hours` is either assumption-based required hours or measured actual hours.
pub fn utilization_pct(hours: f64, total_capacity_hours: f64) -> Option<f64> {
    if !(total_capacity_hours > 0.0) {
        return None;
    }
    let pct = hours / total_capacity_hours * 100.0;
    pct.is_finite().then_some(pct)
}

/// Whole clients a bucket can carry at `target_utilization_pct`.
pub fn max_clients(total_capacity_hours: f64, target_utilization_pct: f64, hours_per_client: f64) -> Option<i64> {
    if !(hours_per_client > 0.0) {
        return None;
    }
    let slots = (total_capacity_hours * target_utilization_pct / 100.0) / hours_per_client;
    slots.is_finite().then(|| slots.floor() as i64)
}

/// Additional clients before the bucket reaches its target. Never negative.
pub fn open_capacity(max_clients: i64, active_clients: u64) -> u64 {
    let active = i64::try_from(active_clients).unwrap_or(i64::MAX);
    max_clients.saturating_sub(active).max(0) as u64
}

/// Derived capacity figures for one bucket in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    pub bucket: BucketId,
    pub total_capacity_hours: f64,
    /// Required hours (assumption path) or actual hours (measured path).
    pub hours: f64,
    pub utilization_pct: Option<f64>,
    pub target_utilization_pct: f64,
}

impl CapacitySnapshot {
    pub fn new(bucket: BucketId, total_capacity_hours: f64, hours: f64, target_utilization_pct: f64) -> Self {
        Self {
            bucket,
            total_capacity_hours,
            hours,
            utilization_pct: utilization_pct(hours, total_capacity_hours),
            target_utilization_pct,
        }
    }

    /// Hours left before the bucket is fully booked. Negative when over capacity.
    pub fn headroom_hours(&self) -> f64 {
        self.total_capacity_hours - self.hours
    }
}

/// Firm utilization is the most stressed bucket, not an average.
pub fn firm_utilization(snapshots: &[CapacitySnapshot]) -> Option<f64> {
    snapshots
        .iter()
        .filter_map(|s| s.utilization_pct)
        .fold(None, |acc: Option<f64>, u| Some(acc.map_or(u, |a| a.max(u))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_formula() {
        assert_eq!(utilization_pct(80.0, 160.0), Some(50.0));
        assert_eq!(utilization_pct(200.0, 160.0), Some(125.0));
        assert_eq!(utilization_pct(0.0, 160.0), Some(0.0));
    }

    #[test]
    fn test_zero_capacity_is_undefined() {
        assert_eq!(utilization_pct(10.0, 0.0), None);
        assert_eq!(utilization_pct(0.0, 0.0), None);
        assert_eq!(utilization_pct(10.0, -40.0), None);
        assert_eq!(utilization_pct(10.0, f64::NAN), None);
    }

    #[test]
    fn test_utilization_monotonic_in_hours() {
        let cap = 420.0;
        let mut last = f64::MIN;
        for h in [0.0, 1.0, 50.5, 200.0, 419.9, 420.0, 800.0] {
            let u = utilization_pct(h, cap).unwrap();
            assert!(u >= last, "{u} < {last}");
            last = u;
        }
    }

    #[test]
    fn test_max_clients_floors() {
        assert_eq!(max_clients(160.0, 85.0, 5.5), Some(24));
        assert_eq!(max_clients(160.0, UNCAPPED_TARGET_PCT, 5.5), Some(29));
        assert_eq!(max_clients(160.0, 85.0, 0.0), None);
        assert_eq!(max_clients(160.0, 85.0, -2.0), None);
        assert_eq!(max_clients(0.0, 85.0, 5.5), Some(0));
    }

    #[test]
    fn test_open_capacity_never_negative() {
        assert_eq!(open_capacity(24, 30), 0);
        assert_eq!(open_capacity(24, 20), 4);
        assert_eq!(open_capacity(-3, 0), 0);
    }

    #[test]
    fn test_firm_utilization_is_max_bucket() {
        let snaps = vec![
            CapacitySnapshot::new(BucketId::Advisors, 400.0, 200.0, 85.0),
            CapacitySnapshot::new(BucketId::Support, 100.0, 95.0, 85.0),
            CapacitySnapshot::new(BucketId::Tax, 0.0, 30.0, 85.0),
        ];
        let firm = firm_utilization(&snaps).unwrap();
        assert!((firm - 95.0).abs() < 1e-9);
        assert_eq!(firm_utilization(&snaps[2..]), None);
        assert_eq!(snaps[1].headroom_hours(), 5.0);
    }

    #[test]
    fn test_repeatable_bits() {
        let a = utilization_pct(137.25, 433.0).unwrap();
        let b = utilization_pct(137.25, 433.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
