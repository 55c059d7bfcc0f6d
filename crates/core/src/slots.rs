//! Slot Extraction
//!
//! Pattern-based extraction of individual slots (rating, years, title, actor)
//! from free-form chat text. Every extractor is total: it returns `None`
//! rather than failing when its slot is absent or malformed.

use regex::Regex;
use std::sync::LazyLock;

use crate::genre::{extract_genre, Genre};
use crate::types::YearRange;

/// Default character limit applied by [`sanitize`]
pub const DEFAULT_MAX_LEN: usize = 2048;

// ============================================================================
// Patterns
// ============================================================================

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("Invalid regex"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)[0-9]{2})\b").expect("Invalid regex"));

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:19|20)[0-9]{2})\s*(?:-|–|—|to|till?)\s*((?:19|20)[0-9]{2})\b")
        .expect("Invalid regex")
});

static DECIMAL_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]),([0-9])").expect("Invalid regex"));

/// Rating pattern families, in priority order
static RATING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:over|minimum|min)\.?\s*([0-9]+(?:\.[0-9]+)?)",
        r"\b(?:rating|score)\s*(?:of|:|>=?|=)?\s*([0-9]+(?:\.[0-9]+)?)",
        r"\b([0-9]+(?:\.[0-9]+)?)\+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["“”]([^"“”]+)["“”]"#).expect("Invalid regex"));

// A single quote only delimits a title when it sits outside a word, so the
// apostrophes in "What's" or "Tom's" never open one.
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\W)['‘’]([^'‘’]+)['‘’](?:\W|$)").expect("Invalid regex")
});

static TITLE_HINTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i:\btell\s+me\s+about)\s+(\p{Lu}[\w\s:'’\-]*)",
        r"(?i:\bwhat(?:'s|’s|\s+is))\s+(\p{Lu}[\w\s:'’\-]*?)\s+(?i:about)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

static TITLE_FILLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\b(?:please|thanks)\b.*$").expect("Invalid regex"));

/// Actor patterns, in priority order. `star` is lowercase-only so a title
/// like "Star Wars" is not read as an actor cue.
static ACTOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const NAME: &str = r"(\p{Lu}[\p{L}.'’\-]*(?:\s+\p{Lu}[\p{L}.'’\-]*)*)";
    [
        format!(r"(?i:\bstarring)\s+{NAME}"),
        format!(r"(?i:\bwith)\s+{NAME}"),
        format!(r"(?i:\bfeaturing)\s+{NAME}"),
        format!(r"\bstar(?:ring)?\s+{NAME}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

// ============================================================================
// Sanitizing
// ============================================================================

/// Normalize raw user text before extraction.
///
/// Line breaks and tabs become spaces, other control characters are
/// dropped, space runs collapse to one, and the result is trimmed and cut to
/// `max_len` characters. Idempotent.
pub fn sanitize(text: &str, max_len: usize) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' | '\n' | '\t' => cleaned.push(' '),
            c if c.is_control() && !c.is_whitespace() => {}
            c => cleaned.push(c),
        }
    }

    let collapsed = MULTI_SPACE.replace_all(&cleaned, " ");
    let truncated: String = collapsed.trim().chars().take(max_len).collect();
    truncated.trim_end().to_string()
}

// ============================================================================
// Numeric Slots
// ============================================================================

/// First standalone 19xx/20xx year in the text
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR.captures(text)
        .and_then(|cap| cap[1].parse().ok())
}

/// A "2015 to 2020" style range, returned smallest year first
pub fn extract_year_range(text: &str) -> Option<YearRange> {
    let cap = YEAR_RANGE.captures(text)?;
    let a: i32 = cap[1].parse().ok()?;
    let b: i32 = cap[2].parse().ok()?;
    Some(YearRange::new(a, b))
}

/// Minimum rating threshold, clamped into [0, 10]
pub fn extract_rating(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    // European decimals: "7,5" -> "7.5"
    let normalized = DECIMAL_COMMA.replace(&lower, "$1.$2");

    RATING_PATTERNS
        .iter()
        .find_map(|re| re.captures(&normalized))
        .and_then(|cap| cap[1].parse::<f64>().ok())
        .map(|n| n.clamp(0.0, 10.0))
}

// ============================================================================
// Text Slots
// ============================================================================

fn min_len(s: &str) -> Option<String> {
    let s = s.trim();
    (s.chars().count() >= 2).then(|| s.to_string())
}

/// Title enclosed in double/smart quotes, else single quotes. A quoted run
/// too short to be a title does not block the next quote style.
pub fn extract_quoted_title(text: &str) -> Option<String> {
    [&*DOUBLE_QUOTED, &*SINGLE_QUOTED]
        .into_iter()
        .filter_map(|re| re.captures(text))
        .find_map(|cap| min_len(&cap[1]))
}

/// Unquoted title from "tell me about X" or "what's X about", where X starts
/// with a capital letter
pub fn extract_title_hint(text: &str) -> Option<String> {
    let cap = TITLE_HINTS.iter().find_map(|re| re.captures(text))?;
    let title = TITLE_FILLER.replace(&cap[1], "");
    min_len(&title)
}

/// Actor name introduced by "starring", "with", "featuring" or "star". The
/// first pattern whose name is at least two characters wins.
pub fn extract_actor(text: &str) -> Option<String> {
    ACTOR_PATTERNS
        .iter()
        .filter_map(|re| re.captures(text))
        .find_map(|cap| min_len(&cap[1]))
}

// ============================================================================
// Slot Bag
// ============================================================================

/// Every slot extracted from one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotBag {
    pub clean_text: String,
    pub lower_text: String,
    pub min_rating: Option<f64>,
    pub year: Option<i32>,
    pub year_range: Option<YearRange>,
    pub genre: Option<Genre>,
    pub title: Option<String>,
    pub actor: Option<String>,
}

impl SlotBag {
    /// Run every extractor over `raw`. A detected year range suppresses the
    /// single year.
    pub fn extract(raw: &str, max_len: usize) -> Self {
        let clean_text = sanitize(raw, max_len);
        let lower_text = clean_text.to_lowercase();

        let min_rating = extract_rating(&lower_text);
        let year_range = extract_year_range(&lower_text);
        let year = match year_range {
            Some(_) => None,
            None => extract_year(&clean_text),
        };
        let title = extract_quoted_title(&clean_text).or_else(|| extract_title_hint(&clean_text));
        let genre = extract_genre(&lower_text);
        let actor = extract_actor(&clean_text);

        Self {
            clean_text,
            lower_text,
            min_rating,
            year,
            year_range,
            genre,
            title,
            actor,
        }
    }

    /// True when any discovery filter (genre, rating, year, range) is set
    pub fn has_filter(&self) -> bool {
        self.genre.is_some()
            || self.min_rating.is_some()
            || self.year.is_some()
            || self.year_range.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_whitespace() {
        assert_eq!(sanitize("  find\r\na\tcomedy   now  ", DEFAULT_MAX_LEN), "find a comedy now");
    }

    #[test]
    fn test_sanitize_strips_controls() {
        assert_eq!(sanitize("fi\u{0007}nd \u{0000}me", DEFAULT_MAX_LEN), "find me");
    }

    #[test]
    fn test_sanitize_truncates_by_chars() {
        assert_eq!(sanitize("Amélie é", 6), "Amélie");
        assert_eq!(sanitize("ab cd", 3), "ab");
        assert_eq!(sanitize("anything", 0), "");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("movies from 1999 or 2004"), Some(1999));
        assert_eq!(extract_year("room 1850"), None);
        assert_eq!(extract_year("code 20155"), None);
    }

    #[test]
    fn test_extract_year_range_separators() {
        let expected = Some(YearRange::new(2015, 2020));
        assert_eq!(extract_year_range("2015 to 2020"), expected);
        assert_eq!(extract_year_range("2015-2020"), expected);
        assert_eq!(extract_year_range("2015 – 2020"), expected);
        assert_eq!(extract_year_range("2015—2020"), expected);
        assert_eq!(extract_year_range("2015 TIL 2020"), expected);
        assert_eq!(extract_year_range("just 2015"), None);
    }

    #[test]
    fn test_extract_year_range_reversed() {
        let range = extract_year_range("2020 to 2015").unwrap();
        assert_eq!((range.start(), range.end()), (2015, 2020));
    }

    #[test]
    fn test_extract_rating_families() {
        assert_eq!(extract_rating("over 7.5"), Some(7.5));
        assert_eq!(extract_rating("Minimum 6"), Some(6.0));
        assert_eq!(extract_rating("rating 8"), Some(8.0));
        assert_eq!(extract_rating("score of 6.5"), Some(6.5));
        assert_eq!(extract_rating("sci-fi 7+"), Some(7.0));
        assert_eq!(extract_rating("a comedy"), None);
    }

    #[test]
    fn test_extract_rating_priority() {
        // "over" is tried before a bare "N+"
        assert_eq!(extract_rating("8+ or over 6"), Some(6.0));
    }

    #[test]
    fn test_extract_rating_decimal_comma() {
        assert_eq!(extract_rating("über 7 minimum 7,5"), Some(7.5));
    }

    #[test]
    fn test_extract_rating_clamps() {
        assert_eq!(extract_rating("over 42"), Some(10.0));
        assert_eq!(extract_rating("15+"), Some(10.0));
    }

    #[test]
    fn test_extract_quoted_title() {
        assert_eq!(extract_quoted_title(r#"Tell me about "Inception""#), Some("Inception".to_string()));
        assert_eq!(extract_quoted_title("plot of “Amélie”"), Some("Amélie".to_string()));
        assert_eq!(extract_quoted_title("I'd like 'Heat' please"), Some("Heat".to_string()));
        assert_eq!(extract_quoted_title(r#"about "X""#), None);
    }

    #[test]
    fn test_extract_quoted_title_short_double_falls_back_to_single() {
        assert_eq!(
            extract_quoted_title(r#"not "X" but 'Heat'"#),
            Some("Heat".to_string())
        );
    }

    #[test]
    fn test_extract_quoted_title_ignores_apostrophes() {
        assert_eq!(extract_quoted_title("What's Tom's best movie"), None);
    }

    #[test]
    fn test_extract_title_hint() {
        assert_eq!(extract_title_hint("What's Interstellar about"), Some("Interstellar".to_string()));
        assert_eq!(
            extract_title_hint("what is The Dark Knight about?"),
            Some("The Dark Knight".to_string())
        );
        assert_eq!(
            extract_title_hint("Tell me about Blade Runner 2049 please, thanks"),
            Some("Blade Runner 2049".to_string())
        );
        assert_eq!(extract_title_hint("What's it about?"), None);
    }

    #[test]
    fn test_extract_title_hint_keeps_other_trailing_text() {
        // only please/thanks are treated as filler
        assert_eq!(
            extract_title_hint("tell me about Heat for tonight"),
            Some("Heat for tonight".to_string())
        );
    }

    #[test]
    fn test_extract_actor() {
        assert_eq!(extract_actor("Find a movie starring Tom Hanks"), Some("Tom Hanks".to_string()));
        assert_eq!(
            extract_actor("a comedy with Penélope Cruz from 2008"),
            Some("Penélope Cruz".to_string())
        );
        assert_eq!(
            extract_actor("something featuring Samuel L. Jackson"),
            Some("Samuel L. Jackson".to_string())
        );
        assert_eq!(extract_actor("a movie with friends"), None);
    }

    #[test]
    fn test_extract_actor_pattern_order() {
        // "starring" is tried before "with"
        assert_eq!(
            extract_actor("with Meg Ryan starring Tom Hanks"),
            Some("Tom Hanks".to_string())
        );
    }

    #[test]
    fn test_extract_actor_short_name_falls_through() {
        // "starring X" is too short, so the "with" pattern is used
        assert_eq!(
            extract_actor("starring X with Meg Ryan"),
            Some("Meg Ryan".to_string())
        );
    }

    #[test]
    fn test_extract_actor_ignores_star_wars() {
        assert_eq!(extract_actor("Find Star Wars movies"), None);
        assert_eq!(extract_actor("a film where the star Keanu Reeves"), Some("Keanu Reeves".to_string()));
    }

    #[test]
    fn test_slot_bag_range_suppresses_year() {
        let bag = SlotBag::extract("Find a comedy over 7.5 from 2015 to 2020", DEFAULT_MAX_LEN);
        assert_eq!(bag.year, None);
        assert_eq!(bag.year_range, Some(YearRange::new(2015, 2020)));
        assert_eq!(bag.genre, Some(Genre::Comedy));
        assert_eq!(bag.min_rating, Some(7.5));
        assert!(bag.has_filter());
    }

    #[test]
    fn test_slot_bag_text_fields() {
        let bag = SlotBag::extract("  Show ME\nsomething  ", DEFAULT_MAX_LEN);
        assert_eq!(bag.clean_text, "Show ME something");
        assert_eq!(bag.lower_text, "show me something");
        assert!(!bag.has_filter());
    }

    proptest! {
        #[test]
        fn prop_sanitize_idempotent(s in any::<String>(), max_len in 0usize..64) {
            let once = sanitize(&s, max_len);
            prop_assert_eq!(sanitize(&once, max_len), once);
        }

        #[test]
        fn prop_year_range_ordered(a in 1900i32..2100, b in 1900i32..2100, sep in "(-|–|—| to | til )") {
            let text = format!("{a}{sep}{b}");
            let range = extract_year_range(&text).unwrap();
            prop_assert!(range.start() <= range.end());
            prop_assert_eq!(range.start(), a.min(b));
            prop_assert_eq!(range.end(), a.max(b));
        }
    }
}
