//! Rule-based Movie Intent Extractor Core Library
//!
//! This crate provides the core functionality for the movie chat assistant:
//! - Slot extraction (rating, years, genre, title, actor)
//! - Intent classification over the extracted slots
//! - File-backed response cache and HTTP GET wrapper
//! - Runtime configuration

pub mod types;

pub mod cache;
pub mod config;
pub mod genre;
pub mod http;
pub mod router;
pub mod slots;

// Re-export commonly used types at crate root
pub use config::Config;
pub use genre::Genre;
pub use types::{Intent, Slots, YearRange};

pub use router::{classify, classify_with_max_len, DEFAULT_MIN_RATING};
pub use slots::{sanitize, SlotBag, DEFAULT_MAX_LEN};
