//! Dashboard assembly: the live-capacity view (measured hours) and the
//! hiring simulator (assumption-driven hours).
//!
//! Both are pure functions of their inputs. `now` is passed in once and every
//! window is derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_hours, BucketHours, TrailingWindow};
use crate::assumptions::Assumptions;
use crate::entry::TimeEntry;
use crate::financials::{monthly_financials, projected_financials, MonthlyFinancials};
use crate::hiring::hires_needed;
use crate::projection::{first_breach, project_growth, status_by_period, BucketProjection};
use crate::roles::BucketId;
use crate::status::{bottleneck, bucket_status, classify, Bottleneck, FirmStatus};
use crate::utilization::{firm_utilization, max_clients, open_capacity, CapacitySnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveBucket {
    pub snapshot: CapacitySnapshot,
    pub status: FirmStatus,
}

/// Measured utilization over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveCapacityReport {
    pub window: TrailingWindow,
    pub actuals: BucketHours,
    pub total_actual_hours: f64,
    pub buckets: Vec<LiveBucket>,
    pub firm_utilization_pct: Option<f64>,
    pub status: FirmStatus,
    pub bottleneck: Option<Bottleneck>,
}

pub fn live_capacity(entries: &[TimeEntry], assumptions: &Assumptions, now: DateTime<Utc>) -> LiveCapacityReport {
    let window = TrailingWindow::last_days(now, assumptions.firm.trailing_days);
    let actuals = aggregate_hours(entries, &window);

    let snapshots: Vec<CapacitySnapshot> = assumptions
        .buckets
        .iter()
        .map(|(id, b)| {
            CapacitySnapshot::new(
                *id,
                b.total_capacity_hours(),
                actuals.hours_for(*id),
                b.target_utilization_pct,
            )
        })
        .collect();

    let report = LiveCapacityReport {
        window,
        total_actual_hours: actuals.total_hours(),
        firm_utilization_pct: firm_utilization(&snapshots),
        status: classify(&snapshots),
        bottleneck: bottleneck(&snapshots),
        buckets: snapshots
            .into_iter()
            .map(|s| LiveBucket {
                status: bucket_status(s.utilization_pct, s.target_utilization_pct),
                snapshot: s,
            })
            .collect(),
        actuals,
    };

    log::debug!(
        "live capacity: {} entries, status={:?}, firm_utilization={:?}",
        entries.len(),
        report.status,
        report.firm_utilization_pct
    );
    report
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedBucket {
    pub snapshot: CapacitySnapshot,
    pub status: FirmStatus,
    pub max_clients: Option<i64>,
    pub open_capacity: Option<u64>,
    pub hires_needed: Option<u32>,
}

/// Assumption-driven capacity, sizing and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub active_clients: u64,
    pub buckets: Vec<SimulatedBucket>,
    pub firm_utilization_pct: Option<f64>,
    pub status: FirmStatus,
    pub bottleneck: Option<Bottleneck>,
    /// Binding (smallest) bucket sizing.
    pub firm_max_clients: Option<i64>,
    pub firm_open_capacity: Option<u64>,
    pub projections: Vec<BucketProjection>,
    pub projected_status: Vec<(u32, FirmStatus)>,
    pub first_breach: Option<(u32, BucketId)>,
    pub financials: MonthlyFinancials,
    pub projected_financials: Vec<(u32, MonthlyFinancials)>,
}

pub fn simulate(assumptions: &Assumptions) -> SimulationReport {
    let clients = assumptions.firm.active_clients;
    let growth = assumptions.firm.monthly_growth_rate_pct;
    let horizon = assumptions.firm.projection_months;

    let buckets: Vec<SimulatedBucket> = assumptions
        .buckets
        .iter()
        .map(|(id, b)| {
            let capacity = b.total_capacity_hours();
            let required = b.required_hours(clients);
            let snapshot = CapacitySnapshot::new(*id, capacity, required, b.target_utilization_pct);
            let max = max_clients(capacity, b.target_utilization_pct, b.hours_per_client);
            SimulatedBucket {
                status: bucket_status(snapshot.utilization_pct, b.target_utilization_pct),
                max_clients: max,
                open_capacity: max.map(|m| open_capacity(m, clients)),
                hires_needed: hires_needed(required, b.headcount, b.capacity_per_head, b.target_utilization_pct),
                snapshot,
            }
        })
        .collect();

    let snapshots: Vec<CapacitySnapshot> = buckets.iter().map(|b| b.snapshot.clone()).collect();

    let projections: Vec<BucketProjection> = assumptions
        .buckets
        .iter()
        .map(|(id, b)| BucketProjection {
            bucket: *id,
            target_utilization_pct: b.target_utilization_pct,
            points: project_growth(clients, growth, horizon, b.hours_per_client, b.total_capacity_hours()),
        })
        .collect();

    let firm_max_clients = buckets.iter().filter_map(|b| b.max_clients).min();
    let client_series = projections.first().map(|p| p.points.as_slice()).unwrap_or(&[]);

    let report = SimulationReport {
        active_clients: clients,
        firm_utilization_pct: firm_utilization(&snapshots),
        status: classify(&snapshots),
        bottleneck: bottleneck(&snapshots),
        firm_max_clients,
        firm_open_capacity: firm_max_clients.map(|m| open_capacity(m, clients)),
        projected_status: status_by_period(&projections),
        first_breach: first_breach(&projections),
        financials: monthly_financials(assumptions, clients),
        projected_financials: projected_financials(assumptions, client_series),
        projections,
        buckets,
    };

    log::debug!(
        "simulate: clients={} growth={}% status={:?} first_breach={:?}",
        clients,
        growth,
        report.status,
        report.first_breach
    );
    report
}
