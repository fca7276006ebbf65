//! Hindi language utilities
//!
//! Shared by the extraction engine and intent classifier: Devanagari numeral
//! conversion, Hindi number words, and utterance normalization.

/// Convert a Hindi number word (Devanagari script) to its numeric value.
///
/// Covers the number words the extraction rules pair with साल/लाख/करोड़.
///
/// # Examples
/// ```
/// use yojana_agent_text_processing::hindi::word_to_number;
/// assert_eq!(word_to_number("पांच"), Some(5.0));
/// assert_eq!(word_to_number("पचास"), Some(50.0));
/// ```
pub fn word_to_number(word: &str) -> Option<f64> {
    match word {
        "एक" => Some(1.0),
        "दो" => Some(2.0),
        "तीन" => Some(3.0),
        "चार" => Some(4.0),
        "पांच" | "पाँच" => Some(5.0),
        "छह" | "छः" | "छे" => Some(6.0),
        "सात" => Some(7.0),
        "आठ" => Some(8.0),
        "नौ" => Some(9.0),
        "दस" => Some(10.0),
        "बीस" => Some(20.0),
        "पच्चीस" => Some(25.0),
        "तीस" => Some(30.0),
        "पैंतीस" => Some(35.0),
        "चालीस" => Some(40.0),
        "पचास" => Some(50.0),
        "साठ" => Some(60.0),
        "सत्तर" => Some(70.0),
        "अस्सी" => Some(80.0),
        "नब्बे" => Some(90.0),
        "सौ" => Some(100.0),
        _ => None,
    }
}

/// Convert Devanagari numerals (०-९) to ASCII digits, passing everything
/// else through unchanged.
pub fn devanagari_to_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '०' => '0',
            '१' => '1',
            '२' => '2',
            '३' => '3',
            '४' => '4',
            '५' => '5',
            '६' => '6',
            '७' => '7',
            '८' => '8',
            '९' => '9',
            _ => c,
        })
        .collect()
}

/// Normalize an utterance before rule matching: trim, fold ASCII case and
/// convert Devanagari numerals. Devanagari text itself has no case, so
/// lowercasing only affects romanized words.
pub fn normalize(text: &str) -> String {
    devanagari_to_ascii(text.trim()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_number_words() {
        assert_eq!(word_to_number("एक"), Some(1.0));
        assert_eq!(word_to_number("पांच"), Some(5.0));
        assert_eq!(word_to_number("पाँच"), Some(5.0));
        assert_eq!(word_to_number("दस"), Some(10.0));
        assert_eq!(word_to_number("सौ"), Some(100.0));
    }

    #[test]
    fn test_six_variants() {
        assert_eq!(word_to_number("छह"), Some(6.0));
        assert_eq!(word_to_number("छः"), Some(6.0));
        assert_eq!(word_to_number("छे"), Some(6.0));
    }

    #[test]
    fn test_unknown_word() {
        assert_eq!(word_to_number("hello"), None);
        assert_eq!(word_to_number("लाख"), None);
    }

    #[test]
    fn test_devanagari_numerals() {
        assert_eq!(devanagari_to_ascii("५०"), "50");
        assert_eq!(devanagari_to_ascii("१२३४५"), "12345");
        assert_eq!(devanagari_to_ascii("mixed १२ and 34"), "mixed 12 and 34");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Meri Umar २५ Saal  "), "meri umar 25 saal");
    }
}
