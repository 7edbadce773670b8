//! Character-class token estimate
//!
//! Characters are classed by Unicode general category. Letters and decimal
//! digits cost a quarter token, whitespace a fifth, punctuation and symbols
//! two thirds, and everything else (controls, format characters, marks,
//! other numbers, private use) two.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{Nd}]").unwrap());
static SPACE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());
static SYMBOL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{P}\p{S}]").unwrap());

/// Estimated token count with a human-readable breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEstimate {
    /// Estimated number of tokens
    pub tokens: usize,
    /// Breakdown, e.g. `~12 tokens (from 0k words, 0k whitespace, 0k symbols)`
    pub details: String,
}

/// Estimate the token count of `content`
pub fn estimate_tokens(content: &str) -> TokenEstimate {
    if content.is_empty() {
        return TokenEstimate {
            tokens: 0,
            details: String::new(),
        };
    }

    // The three classes are disjoint categories; what none of them claims is "other"
    let words = WORD_CHARS.find_iter(content).count();
    let spaces = SPACE_CHARS.find_iter(content).count();
    let symbols = SYMBOL_CHARS.find_iter(content).count();
    let other = content.chars().count() - words - spaces - symbols;

    let tokens = words / 4 + spaces / 5 + symbols * 2 / 3 + other * 2;

    let mut details = format!(
        "~{} tokens (from {}k words, {}k whitespace, {}k symbols",
        tokens,
        thousands(words),
        thousands(spaces),
        thousands(symbols)
    );
    if other > 0 {
        details.push_str(&format!(", {} other", other));
    }
    details.push(')');

    TokenEstimate { tokens, details }
}

/// Count rounded to the nearest thousand
fn thousands(count: usize) -> usize {
    (count + 500) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let estimate = estimate_tokens("");
        assert_eq!(estimate.tokens, 0);
        assert!(estimate.details.is_empty());
    }

    #[test]
    fn test_character_classes() {
        // 8 word chars -> 2, 5 spaces -> 1, 3 symbols -> 2
        let estimate = estimate_tokens("abcd efgh    (){");
        assert_eq!(estimate.tokens, 5);
        assert_eq!(
            estimate.details,
            "~5 tokens (from 0k words, 0k whitespace, 0k symbols)"
        );
    }

    #[test]
    fn test_other_characters_are_reported() {
        let estimate = estimate_tokens("\u{7}\u{7}");
        assert_eq!(estimate.tokens, 4);
        assert_eq!(
            estimate.details,
            "~4 tokens (from 0k words, 0k whitespace, 0k symbols, 2 other)"
        );
    }

    #[test]
    fn test_format_marks_and_private_use_are_other() {
        for c in ["\u{200B}", "\u{FEFF}", "\u{0301}", "\u{E000}", "²"] {
            let estimate = estimate_tokens(c);
            assert_eq!(estimate.tokens, 2, "{:?}", c);
            assert!(estimate.details.ends_with(", 1 other)"), "{:?}", c);
        }
    }

    #[test]
    fn test_letters_and_decimal_digits_are_words() {
        // Non-Latin letters and Arabic-Indic digits count as word characters
        let estimate = estimate_tokens("日本語٣");
        assert_eq!(estimate.tokens, 1);
        assert!(!estimate.details.contains("other"));

        // Combining accent after a letter: 1 word char plus 1 other
        assert_eq!(estimate_tokens("e\u{0301}").tokens, 2);
    }

    #[test]
    fn test_thousands_round_to_nearest() {
        let words = "a".repeat(1500);
        let estimate = estimate_tokens(&words);
        assert_eq!(estimate.tokens, 375);
        assert!(estimate.details.contains("from 2k words"));
        assert_eq!(thousands(499), 0);
    }
}
