//! Growth projection: compounded client count against flat capacity.
//!
//! Capacity stays at the current level for every period. The question
//! answered is "if staffing does not change, when do we breach?".

use serde::{Deserialize, Serialize};

use crate::roles::BucketId;
use crate::status::{bucket_status, FirmStatus, OVER_CAPACITY_PCT};
use crate::utilization::utilization_pct;

/// Months shown by the hiring simulator.
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Longest horizon accepted from a config file or the command line.
pub const MAX_HORIZON_MONTHS: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period_index: u32,
    pub projected_client_count: u64,
    pub projected_required_hours: f64,
    pub total_capacity_hours: f64,
}

impl ProjectionPoint {
    pub fn utilization_pct(&self) -> Option<f64> {
        utilization_pct(self.projected_required_hours, self.total_capacity_hours)
    }

    pub fn exceeds_capacity(&self) -> bool {
        self.utilization_pct().is_some_and(|u| u > OVER_CAPACITY_PCT)
    }
}

/// `floor(current * (1 + rate/100)^i)`, computed directly for each period.
///
/// A rate below -100% makes the factor negative; counts floor at zero.
/// Growth past the `u64` range saturates at `u64::MAX`.
pub fn projected_client_count(current_clients: u64, monthly_growth_rate_pct: f64, period: u32) -> u64 {
    let exponent = i32::try_from(period).unwrap_or(i32::MAX);
    let factor = (1.0 + monthly_growth_rate_pct / 100.0).powi(exponent);
    let projected = (current_clients as f64 * factor).floor();
    if projected.is_nan() { 0 } else { projected.max(0.0) as u64 }
}

/// Periods `1..=horizon` for one bucket.
pub fn project_growth(
    current_clients: u64,
    monthly_growth_rate_pct: f64,
    horizon: u32,
    hours_per_client: f64,
    total_capacity_hours: f64,
) -> Vec<ProjectionPoint> {
    (1..=horizon)
        .map(|i| {
            let clients = projected_client_count(current_clients, monthly_growth_rate_pct, i);
            ProjectionPoint {
                period_index: i,
                projected_client_count: clients,
                projected_required_hours: clients as f64 * hours_per_client,
                total_capacity_hours,
            }
        })
        .collect()
}

/// Projection series for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketProjection {
    pub bucket: BucketId,
    pub target_utilization_pct: f64,
    pub points: Vec<ProjectionPoint>,
}

impl BucketProjection {
    /// First period whose demand exceeds capacity.
    pub fn breach_period(&self) -> Option<u32> {
        self.points
            .iter()
            .find(|p| p.exceeds_capacity())
            .map(|p| p.period_index)
    }
}

/// Firm status for each projected period, most severe bucket wins.
pub fn status_by_period(projections: &[BucketProjection]) -> Vec<(u32, FirmStatus)> {
    let horizon = projections.iter().map(|p| p.points.len()).max().unwrap_or(0);

    (0..horizon)
        .map(|i| {
            let status = projections
                .iter()
                .filter_map(|bp| {
                    bp.points
                        .get(i)
                        .map(|p| bucket_status(p.utilization_pct(), bp.target_utilization_pct))
                })
                .max()
                .unwrap_or(FirmStatus::Healthy);
            (i as u32 + 1, status)
        })
        .collect()
}

/// Earliest period at which any bucket breaches capacity.
pub fn first_breach(projections: &[BucketProjection]) -> Option<(u32, BucketId)> {
    projections
        .iter()
        .filter_map(|bp| bp.breach_period().map(|p| (p, bp.bucket)))
        .min()
}
