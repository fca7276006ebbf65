//! Field extraction engine
//!
//! Converts a raw utterance into candidate profile field values using ordered
//! rules compiled once at startup. Two rule families exist:
//! - numeric rules (age, income): regex with an optional scale multiplier,
//!   Devanagari numerals and Hindi number words handled before the final
//!   value is produced
//! - keyword rules (gender, category, occupation, student/disability flags,
//!   marital status, state): membership over Devanagari and romanized
//!   keyword lists
//!
//! Rules are tried in a fixed per-field order; the first matching rule wins
//! for that field. Different fields extract independently from the same
//! utterance. The output only ever contains fields found in this utterance.

use crate::hindi;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;
use yojana_agent_core::{
    Category, ExtractedFields, FieldValue, Gender, Profile, ProfileField,
};

const HINDI_NUMBER_WORDS: &str =
    "एक|दो|तीन|चार|पांच|पाँच|छह|छः|छे|सात|आठ|नौ|दस|बीस|पच्चीस|तीस|पैंतीस|चालीस|पचास|साठ|सत्तर|अस्सी|नब्बे|सौ";

/// Income above this is treated as a mis-extraction and discarded
const MAX_PLAUSIBLE_INCOME: f64 = 1_000_000_000.0;

/// A compiled numeric rule
struct NumericRule {
    name: &'static str,
    regex: Regex,
    /// Scale applied to the captured value (1.0 for direct amounts)
    multiplier: f64,
    /// Capture group is a Hindi number word, not digits
    word_value: bool,
}

impl NumericRule {
    fn new(name: &'static str, pattern: &str, multiplier: f64, word_value: bool) -> Self {
        Self {
            name,
            // Patterns are fixed at compile time; a failure here is a bug
            regex: Regex::new(pattern).expect("invalid extraction pattern"),
            multiplier,
            word_value,
        }
    }

    /// Try this rule against normalized text
    fn apply(&self, text: &str) -> Option<f64> {
        let caps = self.regex.captures(text)?;
        let raw = caps.get(1)?.as_str();
        let base = if self.word_value {
            hindi::word_to_number(raw)?
        } else {
            raw.replace(',', "").parse::<f64>().ok()?
        };
        Some(base * self.multiplier)
    }
}

/// A keyword-membership rule producing a fixed field value
struct KeywordRule {
    field: ProfileField,
    keywords: &'static [&'static str],
    value: FieldValue,
}

/// Pattern/rule based extraction over normalized Hindi utterances
pub struct ExtractionEngine {
    age_rules: Vec<NumericRule>,
    income_rules: Vec<NumericRule>,
    keyword_rules: Vec<KeywordRule>,
}

impl ExtractionEngine {
    pub fn new() -> Self {
        let age_rules = vec![
            NumericRule::new("age_years", r"(\d{1,3})\s*(?:साल|वर्ष|years?|yrs?|saal)", 1.0, false),
            NumericRule::new(
                "age_word_years",
                &format!(r"({HINDI_NUMBER_WORDS})\s*(?:साल|वर्ष)"),
                1.0,
                true,
            ),
            NumericRule::new("age_label", r"(?:उम्र|आयु|age|umar)\D{0,12}?(\d{1,3})", 1.0, false),
        ];

        // Ordered: scale words first, then direct rupee amounts, then a bare
        // large number as last resort.
        let income_rules = vec![
            NumericRule::new(
                "word_crore",
                &format!(r"({HINDI_NUMBER_WORDS})\s*(?:करोड़|करोड)"),
                10_000_000.0,
                true,
            ),
            NumericRule::new(
                "word_lakh",
                &format!(r"({HINDI_NUMBER_WORDS})\s*(?:लाख|लख)"),
                100_000.0,
                true,
            ),
            NumericRule::new(
                "word_hazar",
                &format!(r"({HINDI_NUMBER_WORDS})\s*(?:हज़ार|हजार)"),
                1_000.0,
                true,
            ),
            NumericRule::new(
                "crore",
                r"(\d+(?:\.\d+)?)\s*(?:करोड़|करोड|crore|cr\b)",
                10_000_000.0,
                false,
            ),
            NumericRule::new(
                "lakh",
                r"(\d+(?:\.\d+)?)\s*(?:लाख|लख|lakhs?|lac)",
                100_000.0,
                false,
            ),
            NumericRule::new(
                "hazar",
                r"(\d+(?:\.\d+)?)\s*(?:हज़ार|हजार|hazaa?r|thousand)",
                1_000.0,
                false,
            ),
            NumericRule::new(
                "rupees",
                r"(\d+(?:,\d+)*(?:\.\d+)?)\s*(?:रुपये|रूपये|रुपए|₹|rupees|rs\b)",
                1.0,
                false,
            ),
            NumericRule::new("rs_prefix", r"(?:₹|rs\.?|inr)\s*(\d+(?:,\d+)*)", 1.0, false),
            NumericRule::new(
                "income_label",
                r"(?:आय|कमाई|income|salary|कमाता|कमाती)\D{0,16}?(\d{4,9})",
                1.0,
                false,
            ),
            NumericRule::new("plain_number", r"\b(\d{4,8})\b", 1.0, false),
        ];

        // First matching rule wins per field, so negated/compound words come
        // before their substrings (अविवाहित before विवाहित).
        let keyword_rules = vec![
            KeywordRule {
                field: ProfileField::Gender,
                keywords: &["महिला", "औरत", "स्त्री", "लड़की", "female", "woman", "mahila", "aurat"],
                value: FieldValue::Gender(Gender::Female),
            },
            KeywordRule {
                field: ProfileField::Gender,
                keywords: &["पुरुष", "आदमी", "लड़का", "male", "man", "purush", "aadmi"],
                value: FieldValue::Gender(Gender::Male),
            },
            KeywordRule {
                field: ProfileField::Category,
                keywords: &["एसटी", "अनुसूचित जनजाति", "st"],
                value: FieldValue::Category(Category::St),
            },
            KeywordRule {
                field: ProfileField::Category,
                keywords: &["एससी", "अनुसूचित जाति", "sc"],
                value: FieldValue::Category(Category::Sc),
            },
            KeywordRule {
                field: ProfileField::Category,
                keywords: &["ओबीसी", "पिछड़ा", "obc"],
                value: FieldValue::Category(Category::Obc),
            },
            KeywordRule {
                field: ProfileField::Category,
                keywords: &["सामान्य", "जनरल", "general"],
                value: FieldValue::Category(Category::General),
            },
            KeywordRule {
                field: ProfileField::Occupation,
                keywords: &["किसान", "खेती", "farmer", "farming", "agriculture", "kisan"],
                value: FieldValue::Occupation("farmer".to_string()),
            },
            KeywordRule {
                field: ProfileField::Occupation,
                keywords: &["मजदूर", "श्रमिक", "laborer", "labourer", "mazdoor"],
                value: FieldValue::Occupation("laborer".to_string()),
            },
            KeywordRule {
                field: ProfileField::Occupation,
                keywords: &["शिक्षक", "अध्यापक", "teacher"],
                value: FieldValue::Occupation("teacher".to_string()),
            },
            KeywordRule {
                field: ProfileField::Occupation,
                keywords: &["व्यापारी", "दुकानदार", "business", "shopkeeper"],
                value: FieldValue::Occupation("business".to_string()),
            },
            KeywordRule {
                field: ProfileField::IsStudent,
                keywords: &["छात्र", "छात्रा", "विद्यार्थी", "student", "पढ़ाई", "पढ़ता", "पढ़ती"],
                value: FieldValue::IsStudent(true),
            },
            KeywordRule {
                field: ProfileField::HasDisabilities,
                keywords: &["विकलांग", "दिव्यांग", "विकलांगता", "disabled", "disability"],
                value: FieldValue::HasDisabilities(true),
            },
            KeywordRule {
                field: ProfileField::MaritalStatus,
                keywords: &["अविवाहित", "कुंवारा", "कुंवारी", "unmarried", "single"],
                value: FieldValue::MaritalStatus("unmarried".to_string()),
            },
            KeywordRule {
                field: ProfileField::MaritalStatus,
                // Same token the scheme rules use for this status
                keywords: &["विधवा", "विधुर", "widow", "widower"],
                value: FieldValue::MaritalStatus("widowed".to_string()),
            },
            KeywordRule {
                field: ProfileField::MaritalStatus,
                keywords: &["विवाहित", "शादीशुदा", "married"],
                value: FieldValue::MaritalStatus("married".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["उत्तर प्रदेश", "uttar pradesh"],
                value: FieldValue::StateLocation("Uttar Pradesh".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["मध्य प्रदेश", "madhya pradesh"],
                value: FieldValue::StateLocation("Madhya Pradesh".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["बिहार", "bihar"],
                value: FieldValue::StateLocation("Bihar".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["महाराष्ट्र", "maharashtra"],
                value: FieldValue::StateLocation("Maharashtra".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["राजस्थान", "rajasthan"],
                value: FieldValue::StateLocation("Rajasthan".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["पंजाब", "punjab"],
                value: FieldValue::StateLocation("Punjab".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["गुजरात", "gujarat"],
                value: FieldValue::StateLocation("Gujarat".to_string()),
            },
            KeywordRule {
                field: ProfileField::StateLocation,
                keywords: &["दिल्ली", "delhi"],
                value: FieldValue::StateLocation("Delhi".to_string()),
            },
        ];

        Self {
            age_rules,
            income_rules,
            keyword_rules,
        }
    }

    /// Extract candidate field values from one utterance.
    ///
    /// The profile is consulted only to disambiguate a bare-number reply
    /// (the user answering a prompt with just "25"); extraction never copies
    /// existing profile values into the output.
    pub fn extract(&self, utterance: &str, profile: &Profile) -> ExtractedFields {
        let text = hindi::normalize(utterance);
        let words: HashSet<&str> = text.unicode_words().collect();
        let mut out = ExtractedFields::new();

        if let Some(age) = self.extract_age(&text) {
            out.insert(ProfileField::Age, FieldValue::Age(age));
        }

        if let Some(income) = self.extract_income(&text) {
            out.insert(ProfileField::Income, FieldValue::Income(income));
        }

        for rule in &self.keyword_rules {
            if out.contains_key(&rule.field) {
                continue;
            }
            if rule.keywords.iter().any(|kw| keyword_matches(&text, &words, kw)) {
                out.insert(rule.field, rule.value.clone());
            }
        }

        // Bare-number reply: "25" alone answers whichever numeric prompt is
        // still open.
        if out.is_empty() {
            if let Ok(n) = text.trim().parse::<u32>() {
                if profile.age.is_none() && (1..=120).contains(&n) {
                    out.insert(ProfileField::Age, FieldValue::Age(n));
                } else if profile.income.is_none() {
                    out.insert(ProfileField::Income, FieldValue::Income(n as f64));
                }
            }
        }

        if !out.is_empty() {
            tracing::debug!(fields = ?out.keys().collect::<Vec<_>>(), "Extracted fields");
        }

        out
    }

    fn extract_age(&self, text: &str) -> Option<u32> {
        for rule in &self.age_rules {
            if let Some(value) = rule.apply(text) {
                let age = value as i64;
                if (1..=120).contains(&age) {
                    tracing::trace!(rule = rule.name, age, "Age rule matched");
                    return Some(age as u32);
                }
            }
        }
        None
    }

    fn extract_income(&self, text: &str) -> Option<f64> {
        for rule in &self.income_rules {
            if let Some(value) = rule.apply(text) {
                if value > 0.0 && value <= MAX_PLAUSIBLE_INCOME {
                    tracing::trace!(rule = rule.name, income = value, "Income rule matched");
                    return Some(value);
                }
            }
        }
        None
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Single romanized words match on word boundaries; Devanagari and multi-word
/// phrases match as substrings (Hindi morphology keeps the stem intact, e.g.
/// योजनाओं contains योजना).
fn keyword_matches(text: &str, words: &HashSet<&str>, keyword: &str) -> bool {
    if keyword.is_ascii() && !keyword.contains(' ') {
        words.contains(keyword)
    } else {
        text.contains(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ExtractedFields {
        ExtractionEngine::new().extract(text, &Profile::default())
    }

    #[test]
    fn test_age_with_saal() {
        let fields = extract("मेरी उम्र 25 साल है");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(25)));
    }

    #[test]
    fn test_age_devanagari_numerals() {
        let fields = extract("मैं ३० साल का हूं");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(30)));
    }

    #[test]
    fn test_age_number_word() {
        let fields = extract("पच्चीस साल उम्र है मेरी");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(25)));
    }

    #[test]
    fn test_age_label_without_unit() {
        let fields = extract("उम्र 42");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(42)));
    }

    #[test]
    fn test_income_rupees() {
        let fields = extract("मेरी आय 150000 रुपये है");
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(150_000.0))
        );
    }

    #[test]
    fn test_income_lakh_digits() {
        let fields = extract("मैं 2 लाख कमाता हूं");
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(200_000.0))
        );
    }

    #[test]
    fn test_income_lakh_word() {
        let fields = extract("पांच लाख रुपये सालाना");
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(500_000.0))
        );
    }

    #[test]
    fn test_income_hazar_word() {
        let fields = extract("पचास हजार कमाई है");
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(50_000.0))
        );
    }

    #[test]
    fn test_income_crore() {
        let fields = extract("1 करोड़ की आमदनी");
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(10_000_000.0))
        );
    }

    #[test]
    fn test_gender_male() {
        let fields = extract("मैं पुरुष हूं");
        assert_eq!(
            fields.get(&ProfileField::Gender),
            Some(&FieldValue::Gender(Gender::Male))
        );
    }

    #[test]
    fn test_gender_female_romanized() {
        let fields = extract("main mahila hoon");
        assert_eq!(
            fields.get(&ProfileField::Gender),
            Some(&FieldValue::Gender(Gender::Female))
        );
    }

    #[test]
    fn test_category_obc() {
        let fields = extract("मैं ओबीसी श्रेणी से हूं");
        assert_eq!(
            fields.get(&ProfileField::Category),
            Some(&FieldValue::Category(Category::Obc))
        );
    }

    #[test]
    fn test_occupation_farmer() {
        let fields = extract("मैं किसान हूं");
        assert_eq!(
            fields.get(&ProfileField::Occupation),
            Some(&FieldValue::Occupation("farmer".to_string()))
        );
    }

    #[test]
    fn test_marital_unmarried_not_mistaken_for_married() {
        let fields = extract("मैं अविवाहित हूं");
        assert_eq!(
            fields.get(&ProfileField::MaritalStatus),
            Some(&FieldValue::MaritalStatus("unmarried".to_string()))
        );
    }

    #[test]
    fn test_widow_maps_to_scheme_rule_token() {
        let fields = extract("मैं विधवा हूं");
        assert_eq!(
            fields.get(&ProfileField::MaritalStatus),
            Some(&FieldValue::MaritalStatus("widowed".to_string()))
        );
    }

    #[test]
    fn test_multiple_fields_one_utterance() {
        let fields = extract("मैं 30 साल का किसान हूं और 2 लाख कमाता हूं");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(30)));
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(200_000.0))
        );
        assert_eq!(
            fields.get(&ProfileField::Occupation),
            Some(&FieldValue::Occupation("farmer".to_string()))
        );
    }

    #[test]
    fn test_punctuation_does_not_block_match() {
        let fields = extract("मेरी उम्र 25 साल, और मैं पुरुष हूं।");
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(25)));
        assert_eq!(
            fields.get(&ProfileField::Gender),
            Some(&FieldValue::Gender(Gender::Male))
        );
    }

    #[test]
    fn test_no_fields_in_greeting() {
        let fields = extract("नमस्ते, आप कैसे हैं?");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_bare_number_answers_age_prompt() {
        let mut profile = Profile::default();
        let engine = ExtractionEngine::new();
        let fields = engine.extract("25", &profile);
        assert_eq!(fields.get(&ProfileField::Age), Some(&FieldValue::Age(25)));

        // Once age is known, a bare large number answers the income prompt
        profile.age = Some(25);
        let fields = engine.extract("150000", &profile);
        assert_eq!(
            fields.get(&ProfileField::Income),
            Some(&FieldValue::Income(150_000.0))
        );
    }

    #[test]
    fn test_stale_profile_values_never_echoed() {
        let mut profile = Profile::default();
        profile.age = Some(25);
        profile.income = Some(150_000.0);
        let fields = ExtractionEngine::new().extract("मैं पुरुष हूं", &profile);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key(&ProfileField::Gender));
    }
}
