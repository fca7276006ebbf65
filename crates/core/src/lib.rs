//! Core types for the government scheme assistant
//!
//! This crate provides foundational types used across all other crates:
//! - User profile and contradiction tracking
//! - Conversation state, turns and intents
//! - Scheme reference data and eligibility rule parameters
//! - Application records
//! - Error types
//! - Checkpoint store trait for cross-turn state persistence

pub mod application;
pub mod checkpoint;
pub mod conversation;
pub mod error;
pub mod profile;
pub mod scheme;

pub use application::{ApplicationRecord, ApplicationStatus};
pub use checkpoint::StateStore;
pub use conversation::{ConversationState, Intent, Stage, Turn, TurnRole};
pub use error::{Error, Result};
pub use profile::{
    Category, ContradictionRecord, ExtractedFields, FieldValue, Gender, Profile, ProfileField,
    REQUIRED_FIELDS,
};
pub use scheme::{EligibilityOutcome, EligibilityRules, Scheme, SchemeDecision};
