//! Role categories and the static bucket-membership table.
//!
//! Time entries carry a free-text role tag. Every tag the firm uses is a
//! `RoleCategory`; each category belongs to at most one staffing `BucketId`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A staffing pool with its own headcount, capacity and utilization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketId {
    #[serde(rename = "advisors")]
    Advisors,
    #[serde(rename = "support")]
    Support,
    #[serde(rename = "tax")]
    Tax,
}

impl BucketId {
    pub const ALL: [BucketId; 3] = [BucketId::Advisors, BucketId::Support, BucketId::Tax];

    /// Lowercase key used in config files and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            BucketId::Advisors => "advisors",
            BucketId::Support => "support",
            BucketId::Tax => "tax",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BucketId::Advisors => "Advisors",
            BucketId::Support => "Support",
            BucketId::Tax => "Tax",
        }
    }

    /// Categories whose time counts against this bucket.
    pub fn members(&self) -> Vec<RoleCategory> {
        RoleCategory::ALL
            .into_iter()
            .filter(|c| c.bucket() == Some(*self))
            .collect()
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BucketId {
    type Err = UnknownBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisors" | "advisor" => Ok(BucketId::Advisors),
            "support" => Ok(BucketId::Support),
            "tax" => Ok(BucketId::Tax),
            _ => Err(UnknownBucket(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bucket: {0}")]
pub struct UnknownBucket(pub String);

/// Role tag attached to a time entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleCategory {
    #[serde(rename = "advisor")]
    Advisor,
    #[serde(rename = "support")]
    Support,
    #[serde(rename = "tax_preparer")]
    TaxPreparer,
    #[serde(rename = "tax_reviewer")]
    TaxReviewer,
    #[serde(rename = "admin")]
    Admin,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 5] = [
        RoleCategory::Advisor,
        RoleCategory::Support,
        RoleCategory::TaxPreparer,
        RoleCategory::TaxReviewer,
        RoleCategory::Admin,
    ];

    /// Bucket-membership table. `Admin` time is tracked but staffs no bucket.
    pub fn bucket(&self) -> Option<BucketId> {
        match self {
            RoleCategory::Advisor => Some(BucketId::Advisors),
            RoleCategory::Support => Some(BucketId::Support),
            RoleCategory::TaxPreparer | RoleCategory::TaxReviewer => Some(BucketId::Tax),
            RoleCategory::Admin => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RoleCategory::Advisor => "advisor",
            RoleCategory::Support => "support",
            RoleCategory::TaxPreparer => "tax_preparer",
            RoleCategory::TaxReviewer => "tax_reviewer",
            RoleCategory::Admin => "admin",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role category: {0}")]
pub struct UnknownRoleCategory(pub String);

impl FromStr for RoleCategory {
    type Err = UnknownRoleCategory;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match norm.as_str() {
            "advisor" => Ok(RoleCategory::Advisor),
            "support" => Ok(RoleCategory::Support),
            "tax_preparer" | "tax_prep" => Ok(RoleCategory::TaxPreparer),
            "tax_reviewer" => Ok(RoleCategory::TaxReviewer),
            "admin" => Ok(RoleCategory::Admin),
            _ => Err(UnknownRoleCategory(s.to_string())),
        }
    }
}

/// Map a raw entry tag to its bucket. Unknown tags and bucket-less roles give `None`.
pub fn bucket_for_tag(tag: &str) -> Option<BucketId> {
    tag.parse::<RoleCategory>().ok().and_then(|c| c.bucket())
}
