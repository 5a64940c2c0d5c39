//! Time entries as read from the Time Entry Store.
//!
//! The engine treats these as immutable input. Creating, editing and
//! approving entries belongs to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::{bucket_for_tag, BucketId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: String,

    /// Free-text label of the activity.
    pub charge_code: String,

    /// Role tag, e.g. "advisor" or "tax_preparer". Decides the staffing bucket.
    pub category: String,

    pub duration_minutes: u32,

    /// When the work happened (UTC).
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub user_email: Option<String>,
}

impl TimeEntry {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        duration_minutes: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            charge_code: String::new(),
            category: category.into(),
            duration_minutes,
            timestamp,
            notes: None,
            user_email: None,
        }
    }

    pub fn with_charge_code(mut self, code: impl Into<String>) -> Self {
        self.charge_code = code.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_user(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    /// Staffing bucket this entry counts against, if any.
    pub fn bucket(&self) -> Option<BucketId> {
        bucket_for_tag(&self.category)
    }

    pub fn hours(&self) -> f64 {
        self.duration_minutes as f64 / 60.0
    }
}
