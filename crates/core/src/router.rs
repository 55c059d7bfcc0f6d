//! Intent Router
//!
//! Resolves the slots extracted from one message into exactly one intent.
//! Rules are checked in a fixed order and the first match wins, so a message
//! that looks like both a title lookup and an actor search is always a title
//! lookup.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::slots::{SlotBag, DEFAULT_MAX_LEN};
use crate::types::{Intent, Slots};

/// Rating threshold assumed for discovery requests that name no rating
pub const DEFAULT_MIN_RATING: f64 = 7.0;

// ============================================================================
// Phrase Detectors
// ============================================================================

/// Title-seeking phrases. Capture group 1 is the phrase's whole object; an
/// object that is nothing but a pronoun ("what's it about", "plot of that")
/// turns the phrase into a follow-up instead. "what is this movie about"
/// stays a title request.
static TITLE_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\btell me about\s+(.+)",
        r"\bwhat(?:'s|’s|\s+is)\s+(.+?)\s+about\b",
        r"\bplot of\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

static FOLLOWUP_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bwhat(?:'s|’s|\s+is)\s+(?:it|this|that)\s+about\b|\bwho directed (?:it|this|that)\b|\btell me (?:more|about (?:it|this|that))\b|\bplot of (?:it|this|that)\b|\bdetails\b|\bmore info\b",
    )
    .expect("Invalid regex")
});

static DISCOVERY_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:find|show|recommend|suggest|give me|any|looking for)\b").expect("Invalid regex")
});

const PRONOUNS: &[&str] = &["it", "this", "that"];

fn is_title_request(lower_text: &str) -> bool {
    TITLE_PHRASES
        .iter()
        .filter_map(|re| re.captures(lower_text))
        .any(|cap| {
            let object = cap[1].trim_matches(|c: char| !c.is_alphanumeric());
            !PRONOUNS.contains(&object)
        })
}

fn is_followup(lower_text: &str) -> bool {
    FOLLOWUP_PHRASES.is_match(lower_text)
}

fn is_discovery(lower_text: &str) -> bool {
    DISCOVERY_PHRASES.is_match(lower_text)
}

// ============================================================================
// Classification
// ============================================================================

/// Classify a raw user message into an intent
pub fn classify(text: &str) -> Intent {
    classify_with_max_len(text, DEFAULT_MAX_LEN)
}

/// Same as [`classify`], sanitizing the input to at most `max_len` characters
pub fn classify_with_max_len(text: &str, max_len: usize) -> Intent {
    let intent = route(SlotBag::extract(text, max_len));
    debug!(intent = intent.name(), slots = ?intent.slots(), "classified message");
    intent
}

fn route(bag: SlotBag) -> Intent {
    let SlotBag {
        lower_text,
        min_rating,
        year,
        year_range,
        genre,
        title,
        actor,
        ..
    } = bag;
    let t = lower_text.as_str();

    if title.is_some() || is_title_request(t) {
        debug!("rule: title lookup");
        return Intent::FindByTitle(Slots {
            title,
            ..Default::default()
        });
    }

    if actor.is_some() {
        debug!("rule: actor lead");
        return Intent::FindByActorLead(Slots {
            genre,
            min_rating,
            year,
            year_range,
            actor,
            title: None,
        });
    }

    if is_followup(t) {
        debug!("rule: details follow-up");
        return Intent::DetailsFollowup(Slots {
            title,
            ..Default::default()
        });
    }

    let discovery = is_discovery(t);
    let has_year = year.is_some() || year_range.is_some();

    if discovery && (genre.is_some() || min_rating.is_some() || has_year) {
        debug!(defaulted = min_rating.is_none(), "rule: genre and rating discovery");
        return Intent::FindByGenreAndRating(Slots {
            genre,
            min_rating: min_rating.or(Some(DEFAULT_MIN_RATING)),
            year,
            year_range,
            ..Default::default()
        });
    }

    // Shadowed by the rule above, which already accepts a lone year.
    if discovery && genre.is_none() && min_rating.is_none() && has_year {
        debug!("rule: year discovery");
        return Intent::FindByYear(Slots {
            year,
            year_range,
            ..Default::default()
        });
    }

    debug!("rule: fallback");
    Intent::FindByGenreAndRating(Slots {
        genre,
        min_rating,
        year,
        year_range,
        actor,
        title,
    })
}
