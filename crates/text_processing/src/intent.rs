//! Intent classification
//!
//! Maps a normalized utterance to one of the closed intent set via keyword
//! scoring. Each intent owns a fixed list of keyword groups; the score is
//! the number of distinct groups with at least one match. Ties are broken by
//! the fixed priority on [`Intent`], so classification is deterministic.

use crate::hindi;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;
use yojana_agent_core::Intent;

/// Keyword groups for one intent; rule data, not control flow
struct IntentRule {
    intent: Intent,
    groups: &'static [&'static [&'static str]],
}

static RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::FindSchemes,
        groups: &[
            &["योजना", "स्कीम", "scheme", "yojana"],
            &["चाहिए", "बताओ", "बताइए", "दिखाओ", "खोज", "find", "search", "chahiye"],
            &["पात्र", "eligible", "eligibility", "मिल सकती", "कौन सी"],
        ],
    },
    IntentRule {
        intent: Intent::ApplyScheme,
        groups: &[
            &["आवेदन", "अप्लाई", "apply", "application", "फॉर्म भर"],
            &["करना चाहता", "करना चाहती", "करवा", "submit", "भरना"],
        ],
    },
    IntentRule {
        intent: Intent::GetDetails,
        groups: &[
            &["जानकारी", "विवरण", "डिटेल", "detail", "details", "बारे में"],
            &["लाभ", "फायदा", "benefit", "benefits"],
            &["स्थिति", "status", "क्या हुआ"],
        ],
    },
    IntentRule {
        intent: Intent::Greeting,
        groups: &[
            &["नमस्ते", "नमस्कार", "प्रणाम", "हेलो", "हाय", "hello", "hi", "namaste"],
            &["शुभ प्रभात", "good morning", "good evening"],
        ],
    },
    IntentRule {
        intent: Intent::EndConversation,
        groups: &[
            &["समाप्त", "अलविदा", "खत्म", "बंद करो", "bye", "goodbye", "exit", "quit"],
            &["धन्यवाद", "शुक्रिया", "thank"],
        ],
    },
    IntentRule {
        intent: Intent::Clarify,
        groups: &[
            &["समझ नहीं", "समझा नहीं", "फिर से बोल", "दोबारा", "repeat"],
            &["मतलब", "क्या कहा", "what do you mean"],
        ],
    },
    IntentRule {
        intent: Intent::ProvideInfo,
        groups: &[
            &["उम्र", "आयु", "साल", "वर्ष", "age", "saal"],
            &["आय", "कमाई", "कमाता", "कमाती", "रुपये", "लाख", "हजार", "income", "salary"],
            &["पुरुष", "महिला", "आदमी", "औरत", "लड़का", "लड़की"],
            &["किसान", "छात्र", "मजदूर", "शिक्षक", "व्यवसाय"],
            &["एससी", "एसटी", "ओबीसी", "सामान्य", "श्रेणी"],
        ],
    },
];

/// Keyword classifier over the closed intent set
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one utterance.
    ///
    /// `profile_complete` steers the no-match fallback: an incomplete profile
    /// defaults to `ProvideInfo` (keep collecting), a complete one to
    /// `FindSchemes`. The fallback is a deliberate default, not an error.
    pub fn classify(&self, utterance: &str, profile_complete: bool) -> Intent {
        let text = hindi::normalize(utterance);
        let words: HashSet<&str> = text.unicode_words().collect();

        let mut best: Option<(Intent, usize)> = None;
        for rule in RULES {
            let score = rule
                .groups
                .iter()
                .filter(|group| group.iter().any(|kw| matches_keyword(&text, &words, kw)))
                .count();
            if score == 0 {
                continue;
            }
            best = match best {
                None => Some((rule.intent, score)),
                Some((current, current_score)) => {
                    if score > current_score
                        || (score == current_score
                            && rule.intent.priority() > current.priority())
                    {
                        Some((rule.intent, score))
                    } else {
                        Some((current, current_score))
                    }
                }
            };
        }

        let intent = match best {
            Some((intent, score)) => {
                tracing::debug!(intent = %intent, score, "Intent classified");
                intent
            }
            None if profile_complete => Intent::FindSchemes,
            None => Intent::ProvideInfo,
        };
        intent
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Same matching policy as the extraction engine: word boundaries for single
/// romanized words, substring for Devanagari and phrases.
fn matches_keyword(text: &str, words: &HashSet<&str>, keyword: &str) -> bool {
    if keyword.is_ascii() && !keyword.contains(' ') {
        words.contains(keyword)
    } else {
        text.contains(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify(text, false)
    }

    #[test]
    fn test_find_schemes() {
        assert_eq!(classify("मुझे सरकारी योजना चाहिए"), Intent::FindSchemes);
        assert_eq!(classify("कौन सी स्कीम मिल सकती है"), Intent::FindSchemes);
    }

    #[test]
    fn test_apply_scheme() {
        assert_eq!(
            classify("मैं पीएम किसान के लिए आवेदन करना चाहता हूं"),
            Intent::ApplyScheme
        );
        assert_eq!(classify("apply kar do"), Intent::ApplyScheme);
    }

    #[test]
    fn test_get_details() {
        assert_eq!(classify("इस योजना के लाभ के बारे में जानकारी दो"), Intent::GetDetails);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(classify("नमस्ते"), Intent::Greeting);
        assert_eq!(classify("Hello"), Intent::Greeting);
    }

    #[test]
    fn test_end_conversation() {
        assert_eq!(classify("समाप्त करें"), Intent::EndConversation);
        assert_eq!(classify("ठीक है, धन्यवाद"), Intent::EndConversation);
    }

    #[test]
    fn test_provide_info() {
        assert_eq!(classify("मेरी उम्र 25 साल है"), Intent::ProvideInfo);
        assert_eq!(classify("मैं पुरुष हूं"), Intent::ProvideInfo);
    }

    #[test]
    fn test_default_depends_on_profile_completeness() {
        let classifier = IntentClassifier::new();
        // No keyword matches at all
        assert_eq!(classifier.classify("xyz abc", false), Intent::ProvideInfo);
        assert_eq!(classifier.classify("xyz abc", true), Intent::FindSchemes);
    }

    #[test]
    fn test_tie_broken_by_priority() {
        // "योजना" (find) and "आवेदन" (apply) each score one group;
        // apply_scheme has higher priority and must win deterministically.
        assert_eq!(classify("योजना आवेदन"), Intent::ApplyScheme);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = IntentClassifier::new();
        let first = classifier.classify("योजना के लिए आवेदन", false);
        for _ in 0..10 {
            assert_eq!(classifier.classify("योजना के लिए आवेदन", false), first);
        }
    }
}
