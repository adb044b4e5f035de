//! Address tokenization.
//!
//! Turns a free-text address into a [`ParsedQuery`]: the first isolated 6-digit PIN code plus a
//! de-duplicated set of locality keywords with postal stop-words removed.
use std::collections::BTreeSet;

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Address suffixes, administrative terms, postal abbreviations, filler and direction words.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // suffixes
    "road", "rd", "street", "st", "marg", "path", "lane", "gali", "nagar", "colony", "layout",
    "extension", "extn", "sector", "sec", "phase", "ph", "apartment", "apartments", "apt", "appts",
    "building", "bldg", "complex", "house", "no", "number", "num", "hno",
    // relative position
    "near", "opposite", "opp", "behind", "beside", "adj", "adjacent", "main", "cross", "area",
    "zone", "block", "chowk", "circle",
    // postal
    "post", "office", "po", "so", "bo", "ho", "gpo",
    // administrative
    "tehsil", "taluk", "mandal",
    "floor", "flr", "ground", "grnd",
    // filler
    "and", "or", "the", "of", "in", "at", "on",
    // directions and modifiers
    "new", "old", "north", "south", "east", "west", "central",
];

/// Shortest keyword kept, in characters.
pub const DEFAULT_MIN_KEYWORD_LEN: usize = 3;

static PIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{6})\b").expect("PIN pattern is a valid regex"));
static PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("punctuation pattern is a valid regex"));
static DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s\-/()]+").expect("delimiter pattern is a valid regex"));

/// Structured form of a free-text address.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// First 6-digit run bounded by word boundaries, if any
    pub pin_code: Option<String>,
    /// Lower-cased locality keywords, sorted for deterministic iteration
    pub locality_keywords: BTreeSet<String>,
}

impl ParsedQuery {
    pub fn new<I, S>(pin_code: Option<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pin_code,
            locality_keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pin_code.is_none() && self.locality_keywords.is_empty()
    }

    pub fn has_keywords(&self) -> bool {
        !self.locality_keywords.is_empty()
    }
}

/// Splits addresses into a PIN code and locality keywords.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: AHashSet<String>,
    min_keyword_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            min_keyword_len: DEFAULT_MIN_KEYWORD_LEN,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stop-words on top of the current set. Words are lower-cased.
    pub fn with_extra_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    /// Tokens need at least `len` characters to become keywords.
    pub fn min_keyword_len(mut self, len: usize) -> Self {
        self.min_keyword_len = len;
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Parse one address.
    pub fn tokenize(&self, input: &str) -> ParsedQuery {
        if input.trim().is_empty() {
            return ParsedQuery::default();
        }

        let lowered = input.to_lowercase();
        let pin_code = PIN_RE
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        // Every bounded 6-digit run goes, not just the captured one.
        let without_pins = if pin_code.is_some() {
            PIN_RE.replace_all(&lowered, "")
        } else {
            lowered.as_str().into()
        };
        let cleaned = PUNCTUATION_RE.replace_all(without_pins.trim(), "");

        let locality_keywords = DELIMITER_RE
            .split(&cleaned)
            .map(str::trim)
            .filter(|token| self.keep_token(token))
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        trace!(?pin_code, ?locality_keywords, "Tokenized address");
        ParsedQuery {
            pin_code,
            locality_keywords,
        }
    }

    fn keep_token(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let len = token.chars().count();
        if token.chars().all(|c| c.is_ascii_digit()) && len < 2 {
            return false;
        }
        len >= self.min_keyword_len && !self.stop_words.contains(token)
    }
}

/// Parse an address with the default tokenizer.
pub fn tokenize(input: &str) -> ParsedQuery {
    static DEFAULT: Lazy<Tokenizer> = Lazy::new(Tokenizer::default);
    DEFAULT.tokenize(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(query: &ParsedQuery) -> Vec<&str> {
        query.locality_keywords.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(tokenize(""), ParsedQuery::default());
        assert_eq!(tokenize("   \t "), ParsedQuery::default());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_pin_is_extracted_and_not_a_keyword() {
        let query = tokenize("Connaught Place, New Delhi 110001");
        assert_eq!(query.pin_code.as_deref(), Some("110001"));
        assert_eq!(keywords(&query), vec!["connaught", "delhi", "place"]);
    }

    #[test]
    fn test_only_pin() {
        let query = tokenize("560038");
        assert_eq!(query.pin_code.as_deref(), Some("560038"));
        assert!(!query.has_keywords());
    }

    #[test]
    fn test_first_pin_wins_and_all_pins_are_removed() {
        let query = tokenize("Indiranagar 560038 forwarded to 110001");
        assert_eq!(query.pin_code.as_deref(), Some("560038"));
        assert!(!query.locality_keywords.contains("110001"));
        assert_eq!(keywords(&query), vec!["forwarded", "indiranagar"]);
    }

    #[test]
    fn test_unbounded_digit_runs_are_not_pins() {
        assert_eq!(tokenize("Invalid PIN 12345").pin_code, None);
        assert_eq!(tokenize("Ref 1234567").pin_code, None);
        assert_eq!(tokenize("ab560038").pin_code, None);
    }

    #[test]
    fn test_house_numbers_are_kept() {
        let query = tokenize("123 Main St, Indiranagar Stage 2, 560038");
        assert_eq!(query.pin_code.as_deref(), Some("560038"));
        assert_eq!(keywords(&query), vec!["123", "indiranagar", "stage"]);
    }

    #[test]
    fn test_stop_words_and_short_tokens_are_dropped() {
        let query = tokenize("Near City Mall, Park Street, Kolkata 700016, West Bengal");
        assert_eq!(keywords(&query), vec!["bengal", "city", "kolkata", "mall", "park"]);

        let query = tokenize("H.No 45, 3rd Cross, Shanti Nagar Colony, Hyderabad 500028");
        assert_eq!(query.pin_code.as_deref(), Some("500028"));
        assert_eq!(keywords(&query), vec!["3rd", "hyderabad", "shanti"]);
    }

    #[test]
    fn test_delimiters_split_tokens() {
        let query = tokenize("Anna-Nagar East, Chennai\tTamil  Nadu");
        assert_eq!(keywords(&query), vec!["anna", "chennai", "nadu", "tamil"]);

        // Punctuation is stripped before splitting, so a slash glues its neighbours.
        let query = tokenize("Fort/Colaba");
        assert_eq!(keywords(&query), vec!["fortcolaba"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let query = tokenize("Mumbai mumbai MUMBAI");
        assert_eq!(keywords(&query), vec!["mumbai"]);
    }

    #[test]
    fn test_retokenizing_keywords_is_stable() {
        for address in [
            "Connaught Place, New Delhi 110001",
            "Fort Area Mumbai, Opp GPO",
            "Sector 15, Part II, Gurgaon",
            "123 Main St, Indiranagar Stage 2, 560038",
        ] {
            let first = tokenize(address);
            let joined = first
                .locality_keywords
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(tokenize(&joined).locality_keywords, first.locality_keywords);
        }
    }

    #[test]
    fn test_no_stop_word_survives() {
        let tokenizer = Tokenizer::default();
        let query = tokenizer.tokenize(&DEFAULT_STOP_WORDS.join(", "));
        assert!(query.locality_keywords.is_empty());
    }

    #[test]
    fn test_extra_stop_words_and_min_len() {
        let tokenizer = Tokenizer::new()
            .with_extra_stop_words(["Mall"])
            .min_keyword_len(4);
        let query = tokenizer.tokenize("City Mall Park Kolkata");
        assert!(tokenizer.is_stop_word("mall"));
        assert_eq!(keywords(&query), vec!["city", "kolkata", "park"]);

        let query = tokenizer.tokenize("Fort Colaba Kew");
        assert_eq!(keywords(&query), vec!["colaba", "fort"]);
    }

    #[test]
    fn test_min_keyword_len_is_inclusive() {
        let query = tokenize("Kew Ab Colaba");
        assert_eq!(keywords(&query), vec!["colaba", "kew"]);

        let query = Tokenizer::new().min_keyword_len(6).tokenize("Kew Ab Colaba Thane");
        assert_eq!(keywords(&query), vec!["colaba"]);
    }
}
