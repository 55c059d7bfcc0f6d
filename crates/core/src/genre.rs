//! Genre vocabulary and alias table

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Canonical genres understood by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "adventure")]
    Adventure,
    #[serde(rename = "animation")]
    Animation,
    #[serde(rename = "comedy")]
    Comedy,
    #[serde(rename = "crime")]
    Crime,
    #[serde(rename = "documentary")]
    Documentary,
    #[serde(rename = "drama")]
    Drama,
    #[serde(rename = "family")]
    Family,
    #[serde(rename = "fantasy")]
    Fantasy,
    #[serde(rename = "history")]
    History,
    #[serde(rename = "horror")]
    Horror,
    #[serde(rename = "music")]
    Music,
    #[serde(rename = "mystery")]
    Mystery,
    #[serde(rename = "romance")]
    Romance,
    #[serde(rename = "science fiction")]
    ScienceFiction,
    #[serde(rename = "thriller")]
    Thriller,
    #[serde(rename = "war")]
    War,
    #[serde(rename = "western")]
    Western,
}

impl Genre {
    /// Canonical label stored in an intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Animation => "animation",
            Genre::Comedy => "comedy",
            Genre::Crime => "crime",
            Genre::Documentary => "documentary",
            Genre::Drama => "drama",
            Genre::Family => "family",
            Genre::Fantasy => "fantasy",
            Genre::History => "history",
            Genre::Horror => "horror",
            Genre::Music => "music",
            Genre::Mystery => "mystery",
            Genre::Romance => "romance",
            Genre::ScienceFiction => "science fiction",
            Genre::Thriller => "thriller",
            Genre::War => "war",
            Genre::Western => "western",
        }
    }

    /// Genre id used by the movie database's discover endpoint
    pub fn tmdb_id(&self) -> u32 {
        match self {
            Genre::Action => 28,
            Genre::Adventure => 12,
            Genre::Animation => 16,
            Genre::Comedy => 35,
            Genre::Crime => 80,
            Genre::Documentary => 99,
            Genre::Drama => 18,
            Genre::Family => 10751,
            Genre::Fantasy => 14,
            Genre::History => 36,
            Genre::Horror => 27,
            Genre::Music => 10402,
            Genre::Mystery => 9648,
            Genre::Romance => 10749,
            Genre::ScienceFiction => 878,
            Genre::Thriller => 53,
            Genre::War => 10752,
            Genre::Western => 37,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias table in lookup order. When a text mentions several genres, the
/// entry listed first wins.
pub const GENRE_ALIASES: &[(&str, Genre)] = &[
    ("action", Genre::Action),
    ("adventure", Genre::Adventure),
    ("animation", Genre::Animation),
    ("animated", Genre::Animation),
    ("cartoon", Genre::Animation),
    ("comedy", Genre::Comedy),
    ("comedies", Genre::Comedy),
    ("funny", Genre::Comedy),
    ("crime", Genre::Crime),
    ("documentary", Genre::Documentary),
    ("documentaries", Genre::Documentary),
    ("drama", Genre::Drama),
    ("dramas", Genre::Drama),
    ("family", Genre::Family),
    ("fantasy", Genre::Fantasy),
    ("history", Genre::History),
    ("historical", Genre::History),
    ("horror", Genre::Horror),
    ("scary", Genre::Horror),
    ("music", Genre::Music),
    ("musical", Genre::Music),
    ("mystery", Genre::Mystery),
    ("romance", Genre::Romance),
    ("romantic", Genre::Romance),
    ("rom-com", Genre::Romance),
    ("sci-fi", Genre::ScienceFiction),
    ("scifi", Genre::ScienceFiction),
    ("thriller", Genre::Thriller),
    ("thrillers", Genre::Thriller),
    ("war", Genre::War),
    ("western", Genre::Western),
    ("westerns", Genre::Western),
];

static ALIAS_PATTERNS: LazyLock<Vec<(Regex, Genre)>> = LazyLock::new(|| {
    GENRE_ALIASES
        .iter()
        .map(|(alias, genre)| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(alias)))
                .expect("Invalid genre alias regex");
            (re, *genre)
        })
        .collect()
});

/// Resolve a genre mentioned anywhere in `text`.
///
/// The multi-word alias "science fiction" is checked first as a plain
/// substring; every other alias must match as a whole word.
pub fn extract_genre(text: &str) -> Option<Genre> {
    let t = text.to_lowercase();

    if t.contains("science fiction") {
        return Some(Genre::ScienceFiction);
    }

    ALIAS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(&t))
        .map(|(_, genre)| *genre)
}
