//! User profile, profile fields and contradiction records
//!
//! The profile is the accumulating record of what is known about the user
//! within one conversation thread. Every field is an explicit option; absence
//! means "not yet supplied", never an empty string or sentinel value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Gender of the user. A profile with no gender yet is `Option::None`
/// ("unspecified"), not a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Hindi display form used in replies
    pub fn hindi(&self) -> &'static str {
        match self {
            Gender::Male => "पुरुष",
            Gender::Female => "महिला",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "GENERAL", alias = "General")]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Obc => "OBC",
            Category::General => "GENERAL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for a profile field
///
/// Ordering matters: `REQUIRED_FIELDS` and the missing-field prompt follow
/// the declaration order (age first, then income, then gender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Age,
    Income,
    Gender,
    Occupation,
    Category,
    StateLocation,
    IsStudent,
    HasDisabilities,
    MaritalStatus,
}

/// Required before any eligibility or application tool may run, in ask order.
pub const REQUIRED_FIELDS: [ProfileField; 3] =
    [ProfileField::Age, ProfileField::Income, ProfileField::Gender];

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Income => "income",
            ProfileField::Gender => "gender",
            ProfileField::Occupation => "occupation",
            ProfileField::Category => "category",
            ProfileField::StateLocation => "state_location",
            ProfileField::IsStudent => "is_student",
            ProfileField::HasDisabilities => "has_disabilities",
            ProfileField::MaritalStatus => "marital_status",
        }
    }

    /// Hindi label used when asking for or confirming a field
    pub fn hindi_label(&self) -> &'static str {
        match self {
            ProfileField::Age => "उम्र",
            ProfileField::Income => "आय",
            ProfileField::Gender => "लिंग",
            ProfileField::Occupation => "व्यवसाय",
            ProfileField::Category => "श्रेणी",
            ProfileField::StateLocation => "राज्य",
            ProfileField::IsStudent => "छात्र",
            ProfileField::HasDisabilities => "विकलांगता",
            ProfileField::MaritalStatus => "वैवाहिक स्थिति",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value for one profile field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Age(u32),
    Income(f64),
    Gender(Gender),
    Occupation(String),
    Category(Category),
    StateLocation(String),
    IsStudent(bool),
    HasDisabilities(bool),
    MaritalStatus(String),
}

impl FieldValue {
    /// Which profile field this value belongs to
    pub fn field(&self) -> ProfileField {
        match self {
            FieldValue::Age(_) => ProfileField::Age,
            FieldValue::Income(_) => ProfileField::Income,
            FieldValue::Gender(_) => ProfileField::Gender,
            FieldValue::Occupation(_) => ProfileField::Occupation,
            FieldValue::Category(_) => ProfileField::Category,
            FieldValue::StateLocation(_) => ProfileField::StateLocation,
            FieldValue::IsStudent(_) => ProfileField::IsStudent,
            FieldValue::HasDisabilities(_) => ProfileField::HasDisabilities,
            FieldValue::MaritalStatus(_) => ProfileField::MaritalStatus,
        }
    }

    /// Normalized equality: numeric comparison for age/income, case-insensitive
    /// comparison for free-form strings. A repeated confirmation of the same
    /// value must never look like a contradiction.
    pub fn normalized_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Age(a), FieldValue::Age(b)) => a == b,
            (FieldValue::Income(a), FieldValue::Income(b)) => (a - b).abs() < f64::EPSILON,
            (FieldValue::Gender(a), FieldValue::Gender(b)) => a == b,
            (FieldValue::Category(a), FieldValue::Category(b)) => a == b,
            (FieldValue::IsStudent(a), FieldValue::IsStudent(b)) => a == b,
            (FieldValue::HasDisabilities(a), FieldValue::HasDisabilities(b)) => a == b,
            (FieldValue::Occupation(a), FieldValue::Occupation(b))
            | (FieldValue::StateLocation(a), FieldValue::StateLocation(b))
            | (FieldValue::MaritalStatus(a), FieldValue::MaritalStatus(b)) => {
                a.trim().eq_ignore_ascii_case(b.trim())
            }
            _ => false,
        }
    }

    /// Human-readable form for replies and contradiction prompts
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Age(v) => format!("{} साल", v),
            FieldValue::Income(v) => format!("{} रुपये", *v as i64),
            FieldValue::Gender(g) => g.hindi().to_string(),
            FieldValue::Occupation(s)
            | FieldValue::StateLocation(s)
            | FieldValue::MaritalStatus(s) => s.clone(),
            FieldValue::Category(c) => c.as_str().to_string(),
            FieldValue::IsStudent(b) | FieldValue::HasDisabilities(b) => {
                if *b { "हां" } else { "नहीं" }.to_string()
            }
        }
    }
}

/// Fields extracted from a single utterance, keyed by field.
///
/// Only fields actually found in that utterance appear here; extraction never
/// echoes stale profile values back.
pub type ExtractedFields = BTreeMap<ProfileField, FieldValue>;

/// A detected change to a previously set profile field.
///
/// Appended to the conversation's contradiction log, never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionRecord {
    pub field: ProfileField,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub detected_at: DateTime<Utc>,
}

/// The accumulating user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: Option<u32>,
    pub income: Option<f64>,
    pub gender: Option<Gender>,
    pub occupation: Option<String>,
    pub category: Option<Category>,
    pub state_location: Option<String>,
    pub is_student: Option<bool>,
    pub has_disabilities: Option<bool>,
    pub marital_status: Option<String>,
}

impl Profile {
    /// Current value of a field, if any
    pub fn get(&self, field: ProfileField) -> Option<FieldValue> {
        match field {
            ProfileField::Age => self.age.map(FieldValue::Age),
            ProfileField::Income => self.income.map(FieldValue::Income),
            ProfileField::Gender => self.gender.map(FieldValue::Gender),
            ProfileField::Occupation => self.occupation.clone().map(FieldValue::Occupation),
            ProfileField::Category => self.category.map(FieldValue::Category),
            ProfileField::StateLocation => {
                self.state_location.clone().map(FieldValue::StateLocation)
            }
            ProfileField::IsStudent => self.is_student.map(FieldValue::IsStudent),
            ProfileField::HasDisabilities => self.has_disabilities.map(FieldValue::HasDisabilities),
            ProfileField::MaritalStatus => {
                self.marital_status.clone().map(FieldValue::MaritalStatus)
            }
        }
    }

    /// Apply a field value, overwriting any previous value.
    ///
    /// Contradiction checking happens before this is called; the profile
    /// itself does not decide whether an overwrite is allowed.
    pub fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::Age(v) => self.age = Some(v),
            FieldValue::Income(v) => self.income = Some(v),
            FieldValue::Gender(v) => self.gender = Some(v),
            FieldValue::Occupation(v) => self.occupation = Some(v),
            FieldValue::Category(v) => self.category = Some(v),
            FieldValue::StateLocation(v) => self.state_location = Some(v),
            FieldValue::IsStudent(v) => self.is_student = Some(v),
            FieldValue::HasDisabilities(v) => self.has_disabilities = Some(v),
            FieldValue::MaritalStatus(v) => self.marital_status = Some(v),
        }
    }

    /// Required fields not yet supplied, in ask-priority order
    pub fn missing_required(&self) -> Vec<ProfileField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// True when every required field is present
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}
