//! Mock application portal
//!
//! Submissions are kept in process memory only; ids stay unique within one
//! process via a monotonic counter appended to the timestamp.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use yojana_agent_core::{ApplicationRecord, ApplicationStatus, Profile, Scheme};

use crate::ToolError;

/// Fixed mock turnaround shown in the confirmation reply
const ESTIMATED_PROCESSING_DAYS: u32 = 15;

/// In-memory application store with status lookup
pub struct ApplicationSubmitter {
    records: RwLock<HashMap<String, ApplicationRecord>>,
    counter: AtomicU64,
}

impl ApplicationSubmitter {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Submit an application for `scheme_id` with the profile as filled-in
    /// form data. The scheme id must exist in the given catalog; per-thread
    /// duplicate submission is guarded by the caller against the
    /// conversation's applied set, not here.
    pub fn submit(
        &self,
        scheme_id: &str,
        profile: &Profile,
        catalog: &[Scheme],
    ) -> Result<ApplicationRecord, ToolError> {
        if !catalog.iter().any(|s| s.id == scheme_id) {
            return Err(ToolError::UnknownScheme(scheme_id.to_string()));
        }

        let submitted_at = Utc::now();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let application_id = format!("APP_{}_{}", submitted_at.format("%Y%m%d%H%M%S"), seq);

        let record = ApplicationRecord {
            application_id: application_id.clone(),
            scheme_id: scheme_id.to_string(),
            profile: profile.clone(),
            status: ApplicationStatus::Submitted,
            submitted_at,
            estimated_processing_days: ESTIMATED_PROCESSING_DAYS,
        };

        self.records.write().insert(application_id.clone(), record.clone());
        tracing::info!(%application_id, scheme_id, "Application submitted");

        Ok(record)
    }

    /// Look up a previously submitted application
    pub fn status(&self, application_id: &str) -> Option<ApplicationRecord> {
        self.records.read().get(application_id).cloned()
    }
}

impl Default for ApplicationSubmitter {
    fn default() -> Self {
        Self::new()
    }
}
