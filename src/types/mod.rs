// src/types/mod.rs
//! Shared data model for listings, application history and ranked output

pub mod application;
pub mod listing;
pub mod recommendation;

pub use application::ApplicationRecord;
pub use listing::JobListing;
pub use recommendation::ScoredRecommendation;
