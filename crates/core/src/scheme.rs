//! Scheme reference data and eligibility rule parameters
//!
//! Schemes are static, read-only reference data. The on-disk JSON shape
//! (`{ "schemes": [...] }`) is owned by the catalog loader in the tools
//! crate; the types here only define the in-memory structure.

use crate::profile::{Category, Gender};
use serde::{Deserialize, Serialize};

/// One welfare scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    /// Stable identifier, e.g. `PM_KISAN`
    pub id: String,
    /// Localized display name
    pub name_hindi: String,
    #[serde(default)]
    pub name_english: String,
    /// Benefit description shown when presenting the scheme
    #[serde(default)]
    pub description_hindi: String,
    #[serde(default)]
    pub benefits: String,
    /// Eligibility predicate parameters; absent predicates are vacuously true
    #[serde(default)]
    pub eligibility: EligibilityRules,
}

/// Per-scheme eligibility predicate parameters.
///
/// Every field is optional: a predicate that a scheme does not define is
/// satisfied by every profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Profile category must be one of these when defined
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "category")]
    pub categories: Option<Vec<Category>>,
    /// Profile occupation must be one of these when defined
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "occupation")]
    pub occupations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_student: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_disabilities: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
}

/// Decision for one scheme after an eligibility check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDecision {
    pub scheme_id: String,
    pub name_hindi: String,
    pub description_hindi: String,
    pub benefits: String,
    pub eligible: bool,
    /// Hindi reasons: failed conditions, or the all-satisfied message
    pub reasons: Vec<String>,
}

/// Order-preserving partition of a scheme table into eligible and ineligible
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub eligible: Vec<SchemeDecision>,
    pub ineligible: Vec<SchemeDecision>,
    pub total_checked: usize,
}

impl EligibilityOutcome {
    pub fn eligible_ids(&self) -> Vec<&str> {
        self.eligible.iter().map(|d| d.scheme_id.as_str()).collect()
    }

    pub fn ineligible_ids(&self) -> Vec<&str> {
        self.ineligible.iter().map(|d| d.scheme_id.as_str()).collect()
    }
}
