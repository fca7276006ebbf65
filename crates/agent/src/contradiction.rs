//! Contradiction detection over freshly extracted fields
//!
//! Policy: a differing value is recorded as a contradiction AND still applied,
//! so the profile always carries the newest information while the reply asks
//! the user to confirm. Repeating an already-known value is a no-op, never a
//! contradiction.

use chrono::Utc;
use yojana_agent_core::{ContradictionRecord, ExtractedFields, Profile};

/// Split of one turn's extraction output into values to apply and detected
/// contradictions.
#[derive(Debug, Default)]
pub struct Detection {
    /// Values the controller should write into the profile this turn
    pub to_apply: ExtractedFields,
    /// New contradiction records, in field order
    pub contradictions: Vec<ContradictionRecord>,
}

/// Compare extracted fields against the current profile.
///
/// Does not mutate the profile; the controller applies `to_apply` and appends
/// `contradictions` to the conversation log itself.
pub fn detect(profile: &Profile, extracted: &ExtractedFields) -> Detection {
    let mut detection = Detection::default();

    for (field, new_value) in extracted {
        match profile.get(*field) {
            None => {
                detection.to_apply.insert(*field, new_value.clone());
            }
            Some(ref old_value) if old_value.normalized_eq(new_value) => {
                // Confirmation of a known value
            }
            Some(old_value) => {
                tracing::info!(
                    field = %field,
                    old = %old_value.display_text(),
                    new = %new_value.display_text(),
                    "Contradiction detected"
                );
                detection.contradictions.push(ContradictionRecord {
                    field: *field,
                    old_value,
                    new_value: new_value.clone(),
                    detected_at: Utc::now(),
                });
                detection.to_apply.insert(*field, new_value.clone());
            }
        }
    }

    detection
}
