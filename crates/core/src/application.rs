//! Mock application records

use crate::profile::Profile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a submitted application.
///
/// The mock portal only ever produces `Submitted`; the enum exists so the
/// record shape does not change when a real portal is wired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
}

/// One application to a scheme, created by the application submitter.
///
/// Immutable after creation apart from status transitions (which the mock
/// submitter never performs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Process-unique generated id, e.g. `APP_20260830101530_3`
    pub application_id: String,
    pub scheme_id: String,
    /// Snapshot of the profile at submission time
    pub profile: Profile,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub estimated_processing_days: u32,
}
