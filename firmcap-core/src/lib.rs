//! firmcap-core: capacity model for firm staffing.
//!
//! Turns logged time entries and staffing assumptions into utilization,
//! firm status, bottlenecks, client sizing and growth projections. Pure
//! computation: no I/O, no shared state.

pub mod aggregate;
pub mod assumptions;
pub mod dashboard;
pub mod entry;
pub mod financials;
pub mod hiring;
pub mod projection;
pub mod roles;
pub mod status;
pub mod trend;
pub mod utilization;

pub use aggregate::{
    aggregate_hours, hours_by_charge_code, trailing_hours, BucketHours, ChargeCodeHours, TrailingWindow,
    DEFAULT_TRAILING_DAYS, MAX_TRAILING_DAYS,
};
pub use assumptions::{AssumptionError, Assumptions, BucketAssumptions, FinancialAssumptions, FirmAssumptions};
pub use dashboard::{live_capacity, simulate, LiveBucket, LiveCapacityReport, SimulatedBucket, SimulationReport};
pub use entry::TimeEntry;
pub use financials::{monthly_financials, monthly_staff_cost, projected_financials, MonthlyFinancials};
pub use hiring::hires_needed;
pub use projection::{
    first_breach, project_growth, projected_client_count, status_by_period, BucketProjection, ProjectionPoint,
    DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS,
};
pub use roles::{bucket_for_tag, BucketId, RoleCategory, UnknownBucket, UnknownRoleCategory};
pub use status::{bottleneck, bucket_status, classify, Bottleneck, FirmStatus};
pub use trend::{week_start, weekly_trend, WeekHours, MAX_TREND_WEEKS};
pub use utilization::{
    firm_utilization, max_clients, open_capacity, total_capacity_hours, utilization_pct, CapacitySnapshot,
    UNCAPPED_TARGET_PCT,
};

/// Format an optional percentage, "N/A" when undefined.
pub fn fmt_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => "N/A".to_string(),
    }
}
