//! Monthly revenue and staff cost from the financial assumptions.

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::projection::ProjectionPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancials {
    pub revenue: f64,
    pub staff_cost: f64,
    pub operating_margin: f64,
    /// Undefined when there is no revenue.
    pub margin_pct: Option<f64>,
}

pub fn monthly_staff_cost(a: &Assumptions) -> f64 {
    a.buckets
        .values()
        .map(|b| b.headcount as f64 * b.monthly_cost_per_head)
        .sum()
}

pub fn monthly_financials(a: &Assumptions, clients: u64) -> MonthlyFinancials {
    let revenue = clients as f64 * a.financials.monthly_fee_per_client;
    let staff_cost = monthly_staff_cost(a);
    let operating_margin = revenue - staff_cost;
    let margin_pct = (revenue > 0.0).then(|| operating_margin / revenue * 100.0);

    MonthlyFinancials {
        revenue,
        staff_cost,
        operating_margin,
        margin_pct,
    }
}

/// Financials for each projected period at today's staffing cost.
pub fn projected_financials(a: &Assumptions, points: &[ProjectionPoint]) -> Vec<(u32, MonthlyFinancials)> {
    points
        .iter()
        .map(|p| (p.period_index, monthly_financials(a, p.projected_client_count)))
        .collect()
}
