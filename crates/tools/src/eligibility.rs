//! Eligibility engine
//!
//! Pure function over (profile, scheme table): every defined predicate must
//! pass for a scheme to be eligible; undefined predicates are vacuously
//! satisfied. The output partitions the input table exactly and preserves
//! its order. No I/O, no interior state; calling it twice with the same
//! inputs yields the same result.
//!
//! An unknown optional profile value fails a defined predicate (the scheme
//! lands in `ineligible` with a reason). The controller guarantees the
//! required fields age/income/gender are present before invoking.

use yojana_agent_core::{EligibilityOutcome, Profile, Scheme, SchemeDecision};

/// Hindi reason attached to every eligible scheme
const ALL_CONDITIONS_MET: &str = "सभी पात्रता शर्तें पूरी होती हैं";

pub struct EligibilityEngine;

impl EligibilityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Partition the scheme table into eligible and ineligible, in input order
    pub fn check(&self, profile: &Profile, schemes: &[Scheme]) -> EligibilityOutcome {
        let mut outcome = EligibilityOutcome {
            total_checked: schemes.len(),
            ..Default::default()
        };

        for scheme in schemes {
            let reasons = failed_conditions(profile, scheme);
            let decision = SchemeDecision {
                scheme_id: scheme.id.clone(),
                name_hindi: scheme.name_hindi.clone(),
                description_hindi: scheme.description_hindi.clone(),
                benefits: scheme.benefits.clone(),
                eligible: reasons.is_empty(),
                reasons: if reasons.is_empty() {
                    vec![ALL_CONDITIONS_MET.to_string()]
                } else {
                    reasons
                },
            };

            if decision.eligible {
                outcome.eligible.push(decision);
            } else {
                outcome.ineligible.push(decision);
            }
        }

        tracing::info!(
            eligible = outcome.eligible.len(),
            ineligible = outcome.ineligible.len(),
            "Eligibility check completed"
        );

        outcome
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Hindi reasons for every defined predicate that fails
fn failed_conditions(profile: &Profile, scheme: &Scheme) -> Vec<String> {
    let rules = &scheme.eligibility;
    let mut reasons = Vec::new();

    if let Some(min_age) = rules.min_age {
        if profile.age.map_or(true, |age| age < min_age) {
            reasons.push(format!("उम्र {} से अधिक होनी चाहिए", min_age));
        }
    }

    if let Some(max_age) = rules.max_age {
        if profile.age.map_or(true, |age| age > max_age) {
            reasons.push(format!("उम्र {} से कम होनी चाहिए", max_age));
        }
    }

    if let Some(max_income) = rules.max_income {
        if profile.income.map_or(true, |income| income > max_income) {
            reasons.push(format!("आय {} से कम होनी चाहिए", max_income as i64));
        }
    }

    if let Some(required) = rules.gender {
        if profile.gender != Some(required) {
            reasons.push(format!("लिंग {} होना चाहिए", required.hindi()));
        }
    }

    if let Some(ref categories) = rules.categories {
        if profile.category.map_or(true, |c| !categories.contains(&c)) {
            let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
            reasons.push(format!("श्रेणी {} में होनी चाहिए", names.join(", ")));
        }
    }

    if let Some(ref occupations) = rules.occupations {
        let matches = profile
            .occupation
            .as_deref()
            .map_or(false, |o| occupations.iter().any(|x| x.eq_ignore_ascii_case(o)));
        if !matches {
            reasons.push(format!("व्यवसाय {} होना चाहिए", occupations.join(", ")));
        }
    }

    if let Some(required) = rules.is_student {
        if profile.is_student != Some(required) {
            reasons.push(if required {
                "छात्र होना चाहिए".to_string()
            } else {
                "छात्र नहीं होना चाहिए".to_string()
            });
        }
    }

    if let Some(required) = rules.has_disabilities {
        if profile.has_disabilities != Some(required) {
            reasons.push(if required {
                "विकलांगता होनी चाहिए".to_string()
            } else {
                "विकलांगता नहीं होनी चाहिए".to_string()
            });
        }
    }

    if let Some(ref required) = rules.marital_status {
        let matches = profile
            .marital_status
            .as_deref()
            .map_or(false, |m| m.eq_ignore_ascii_case(required));
        if !matches {
            reasons.push(format!("वैवाहिक स्थिति {} होनी चाहिए", required));
        }
    }

    reasons
}
