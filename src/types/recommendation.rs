// src/types/recommendation.rs
use super::JobListing;
use serde::{Deserialize, Serialize};

/// A listing together with every score the ranker computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    #[serde(flatten)]
    pub listing: JobListing,
    /// 0-100
    pub content_score: f64,
    /// 0-100, unweighted skill overlap
    pub skill_score: f64,
    /// 0-100
    pub collaborative_score: f64,
    /// Blended value rounded to two decimals. Can exceed 100 when the
    /// listing's demand score does.
    pub recommendation_score: f64,
    /// Set by `mark_applied` when the requesting user already applied.
    #[serde(default)]
    pub already_applied: bool,
}
