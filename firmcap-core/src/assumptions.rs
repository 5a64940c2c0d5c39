//! Staffing assumptions: the immutable input set every computation takes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::aggregate::{DEFAULT_TRAILING_DAYS, MAX_TRAILING_DAYS};
use crate::projection::{DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS};
use crate::roles::BucketId;
use crate::utilization::total_capacity_hours;

/// Per-bucket staffing inputs. Hours are per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketAssumptions {
    pub headcount: u32,
    pub capacity_per_head: f64,
    pub hours_per_client: f64,
    pub target_utilization_pct: f64,
    /// Fully loaded monthly cost of one head.
    #[serde(default)]
    pub monthly_cost_per_head: f64,
}

impl BucketAssumptions {
    pub fn total_capacity_hours(&self) -> f64 {
        total_capacity_hours(self.headcount, self.capacity_per_head)
    }

    pub fn required_hours(&self, active_clients: u64) -> f64 {
        active_clients as f64 * self.hours_per_client
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmAssumptions {
    pub active_clients: u64,
    pub monthly_growth_rate_pct: f64,
    #[serde(default = "default_horizon")]
    pub projection_months: u32,
    #[serde(default = "default_trailing_days")]
    pub trailing_days: i64,
    /// IANA timezone for calendar-week boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FinancialAssumptions {
    pub monthly_fee_per_client: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub firm: FirmAssumptions,
    #[serde(default)]
    pub financials: FinancialAssumptions,
    pub buckets: BTreeMap<BucketId, BucketAssumptions>,
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

fn default_trailing_days() -> i64 {
    DEFAULT_TRAILING_DAYS
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Default for Assumptions {
    fn default() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(
            BucketId::Advisors,
            BucketAssumptions {
                headcount: 4,
                capacity_per_head: 140.0,
                hours_per_client: 6.0,
                target_utilization_pct: 85.0,
                monthly_cost_per_head: 11_500.0,
            },
        );
        buckets.insert(
            BucketId::Support,
            BucketAssumptions {
                headcount: 3,
                capacity_per_head: 150.0,
                hours_per_client: 3.5,
                target_utilization_pct: 85.0,
                monthly_cost_per_head: 5_800.0,
            },
        );
        buckets.insert(
            BucketId::Tax,
            BucketAssumptions {
                headcount: 2,
                capacity_per_head: 140.0,
                hours_per_client: 2.0,
                target_utilization_pct: 80.0,
                monthly_cost_per_head: 7_200.0,
            },
        );

        Self {
            firm: FirmAssumptions {
                active_clients: 60,
                monthly_growth_rate_pct: 3.0,
                projection_months: DEFAULT_HORIZON_MONTHS,
                trailing_days: DEFAULT_TRAILING_DAYS,
                timezone: default_timezone(),
            },
            financials: FinancialAssumptions {
                monthly_fee_per_client: 1_250.0,
            },
            buckets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssumptionError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: String, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },

    #[error("{bucket}: target utilization must be in (0, 200], got {value}")]
    TargetOutOfRange { bucket: BucketId, value: f64 },

    #[error("trailing window must be at least one day, got {0}")]
    EmptyWindow(i64),

    #[error("trailing window must be at most {MAX_TRAILING_DAYS} days, got {0}")]
    WindowTooLong(i64),

    #[error("projection horizon must be at most {MAX_HORIZON_MONTHS} months, got {0}")]
    HorizonTooLong(u32),

    #[error("invalid timezone: {0}")]
    Timezone(String),

    #[error("no buckets configured")]
    NoBuckets,
}

fn check_amount(field: String, value: f64) -> Result<(), AssumptionError> {
    if !value.is_finite() {
        return Err(AssumptionError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(AssumptionError::Negative { field, value });
    }
    Ok(())
}

impl Assumptions {
    pub fn bucket(&self, id: BucketId) -> Option<&BucketAssumptions> {
        self.buckets.get(&id)
    }

    /// Boundary validation for user-edited input. The engine does not call this.
    pub fn validate(&self) -> Result<(), AssumptionError> {
        if self.buckets.is_empty() {
            return Err(AssumptionError::NoBuckets);
        }
        if !self.firm.monthly_growth_rate_pct.is_finite() {
            return Err(AssumptionError::NotFinite {
                field: "firm.monthly_growth_rate_pct".to_string(),
                value: self.firm.monthly_growth_rate_pct,
            });
        }
        if self.firm.trailing_days < 1 {
            return Err(AssumptionError::EmptyWindow(self.firm.trailing_days));
        }
        if self.firm.trailing_days > MAX_TRAILING_DAYS {
            return Err(AssumptionError::WindowTooLong(self.firm.trailing_days));
        }
        if self.firm.projection_months > MAX_HORIZON_MONTHS {
            return Err(AssumptionError::HorizonTooLong(self.firm.projection_months));
        }
        if self.firm.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(AssumptionError::Timezone(self.firm.timezone.clone()));
        }
        check_amount(
            "financials.monthly_fee_per_client".to_string(),
            self.financials.monthly_fee_per_client,
        )?;

        for (id, b) in &self.buckets {
            let key = |f: &str| format!("buckets.{}.{}", id.key(), f);
            check_amount(key("capacity_per_head"), b.capacity_per_head)?;
            check_amount(key("hours_per_client"), b.hours_per_client)?;
            check_amount(key("monthly_cost_per_head"), b.monthly_cost_per_head)?;
            if !(b.target_utilization_pct > 0.0 && b.target_utilization_pct <= 200.0) {
                return Err(AssumptionError::TargetOutOfRange {
                    bucket: *id,
                    value: b.target_utilization_pct,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let a = Assumptions::default();
        assert!(a.validate().is_ok());
        assert_eq!(a.bucket(BucketId::Advisors).unwrap().total_capacity_hours(), 560.0);
        assert_eq!(a.bucket(BucketId::Support).unwrap().required_hours(60), 210.0);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let mut a = Assumptions::default();
        a.buckets.get_mut(&BucketId::Support).unwrap().hours_per_client = -1.0;
        assert!(matches!(a.validate(), Err(AssumptionError::Negative { .. })));

        let mut a = Assumptions::default();
        a.buckets.get_mut(&BucketId::Tax).unwrap().target_utilization_pct = 0.0;
        assert_eq!(
            a.validate(),
            Err(AssumptionError::TargetOutOfRange { bucket: BucketId::Tax, value: 0.0 })
        );

        let mut a = Assumptions::default();
        a.firm.timezone = "Mars/Olympus".to_string();
        assert!(matches!(a.validate(), Err(AssumptionError::Timezone(_))));

        let mut a = Assumptions::default();
        a.buckets.clear();
        assert_eq!(a.validate(), Err(AssumptionError::NoBuckets));
    }

    #[test]
    fn test_window_and_horizon_bounds() {
        let mut a = Assumptions::default();
        a.firm.trailing_days = MAX_TRAILING_DAYS;
        a.firm.projection_months = MAX_HORIZON_MONTHS;
        assert!(a.validate().is_ok());

        a.firm.trailing_days = 100_000_000;
        assert_eq!(a.validate(), Err(AssumptionError::WindowTooLong(100_000_000)));

        a.firm.trailing_days = 0;
        assert_eq!(a.validate(), Err(AssumptionError::EmptyWindow(0)));

        let mut a = Assumptions::default();
        a.firm.projection_months = u32::MAX;
        assert_eq!(a.validate(), Err(AssumptionError::HorizonTooLong(u32::MAX)));
    }

    #[test]
    fn test_error_names_the_field() {
        let mut a = Assumptions::default();
        a.buckets.get_mut(&BucketId::Advisors).unwrap().capacity_per_head = f64::INFINITY;
        let msg = a.validate().unwrap_err().to_string();
        assert!(msg.contains("buckets.advisors.capacity_per_head"), "{msg}");

        let mut a = Assumptions::default();
        a.buckets.get_mut(&BucketId::Tax).unwrap().hours_per_client = f64::NAN;
        let msg = a.validate().unwrap_err().to_string();
        assert!(msg.contains("buckets.tax.hours_per_client"), "{msg}");
    }

    #[test]
    fn test_json_uses_bucket_keys() {
        let a = Assumptions::default();
        let json = serde_json::to_value(&a).unwrap();
        assert!(json["buckets"]["advisors"].is_object());
        assert_eq!(json["firm"]["active_clients"], 60);
    }
}
