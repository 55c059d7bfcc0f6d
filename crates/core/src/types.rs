//! Domain models for the intent extractor
//!
//! This module contains the types produced by classification:
//! - Intent variants and their slot payload
//! - Year ranges (always ordered)

use serde::{Deserialize, Serialize};

use crate::genre::Genre;

// ============================================================================
// Year Range
// ============================================================================

/// An inclusive range of release years, always stored with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Build a range from two years given in any order
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }
}

impl From<(i32, i32)> for YearRange {
    fn from((a, b): (i32, i32)) -> Self {
        YearRange::new(a, b)
    }
}

impl From<YearRange> for (i32, i32) {
    fn from(range: YearRange) -> Self {
        (range.start, range.end)
    }
}

// ============================================================================
// Intent
// ============================================================================

/// Slot payload carried by every intent. Slots that are irrelevant to the
/// intent are `None` and serialize as explicit JSON nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slots {
    #[serde(default)]
    pub genre: Option<Genre>,

    #[serde(default)]
    pub min_rating: Option<f64>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub year_range: Option<YearRange>,

    #[serde(default)]
    pub actor: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

impl Slots {
    /// True when no slot is populated; callers may treat this as a cue to ask
    /// the user for clarification.
    pub fn is_empty(&self) -> bool {
        self.genre.is_none()
            && self.min_rating.is_none()
            && self.year.is_none()
            && self.year_range.is_none()
            && self.actor.is_none()
            && self.title.is_none()
    }
}

/// The classified purpose of a user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Intent {
    FindByGenreAndRating(Slots),
    FindByActorLead(Slots),
    FindByTitle(Slots),
    DetailsFollowup(Slots),
    FindByYear(Slots),
}

impl Intent {
    /// Intent name as it appears in the JSON `name` field
    pub fn name(&self) -> &'static str {
        match self {
            Intent::FindByGenreAndRating(_) => "find_by_genre_and_rating",
            Intent::FindByActorLead(_) => "find_by_actor_lead",
            Intent::FindByTitle(_) => "find_by_title",
            Intent::DetailsFollowup(_) => "details_followup",
            Intent::FindByYear(_) => "find_by_year",
        }
    }

    pub fn slots(&self) -> &Slots {
        match self {
            Intent::FindByGenreAndRating(s)
            | Intent::FindByActorLead(s)
            | Intent::FindByTitle(s)
            | Intent::DetailsFollowup(s)
            | Intent::FindByYear(s) => s,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
