// src/recommender/mod.rs
//! Hybrid internship recommender.
//!
//! Raw skills and preferences become a [`UserProfile`]; each listing is
//! scored on content fit and on application popularity; the ranker blends
//! both with the listing's demand score and returns the top results.
//! Everything here is pure computation over borrowed inputs.

pub mod collaborative;
pub mod content;
pub mod profile;
pub mod ranker;

pub use collaborative::{score_collaborative, PopularityIndex};
pub use content::{score_content, ContentScore};
pub use profile::{build_profile, ExperienceLevel, UserPreferences, UserProfile};
pub use ranker::{mark_applied, rank, DEFAULT_TOP_N};
