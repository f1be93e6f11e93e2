//! Internship recommendations for students.
//!
//! The heart of the crate is [`recommender`]: a content-based plus
//! popularity blend that ranks internship listings for one user. The
//! other modules feed it: listings come from a CSV file, skills from a
//! resume, application history from a CSV log or SQLite. [`analytics`]
//! summarises listings and history for the admin and per-user views.

pub mod analytics;
pub mod config;
pub mod demand;
pub mod listings;
pub mod recommender;
pub mod resume_parser;
pub mod search;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::AppConfig;
pub use recommender::{build_profile, rank, UserPreferences, UserProfile};
pub use types::{ApplicationRecord, JobListing, ScoredRecommendation};
