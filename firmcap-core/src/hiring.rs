//! Hiring simulator sizing.

/// Extra heads needed so `required_hours` fits under the target utilization.
///
/// `None` when one head contributes no bookable hours.
pub fn hires_needed(
    required_hours: f64,
    headcount: u32,
    capacity_per_head: f64,
    target_utilization_pct: f64,
) -> Option<u32> {
    let bookable_per_head = capacity_per_head * target_utilization_pct / 100.0;
    if !(bookable_per_head > 0.0) {
        return None;
    }
    let heads = (required_hours / bookable_per_head).ceil();
    if !heads.is_finite() {
        return None;
    }
    let needed = heads.max(0.0) as u64;
    Some(needed.saturating_sub(headcount as u64).min(u32::MAX as u64) as u32)
}
