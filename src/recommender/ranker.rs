// src/recommender/ranker.rs
//! Hybrid ranking: content and collaborative scores blended, then
//! boosted by each listing's demand score.

use super::collaborative::PopularityIndex;
use super::content::score_content;
use super::profile::UserProfile;
use crate::types::{ApplicationRecord, JobListing, ScoredRecommendation};
use crate::utils::round2;
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_TOP_N: usize = 20;
pub const CONTENT_WEIGHT: f64 = 0.7;
pub const COLLABORATIVE_WEIGHT: f64 = 0.3;
pub const DEMAND_BASE: f64 = 0.8;
pub const DEMAND_WEIGHT: f64 = 0.2;

/// Unrounded final score for already computed component scores.
/// `demand_score` is deliberately not clamped: values above 100 push the
/// result past the nominal ceiling.
pub fn blend_scores(content_score: f64, collaborative_score: f64, demand_score: f64) -> f64 {
    let hybrid = CONTENT_WEIGHT * content_score + COLLABORATIVE_WEIGHT * collaborative_score;
    let demand_factor = demand_score / 100.0;
    hybrid * (DEMAND_BASE + DEMAND_WEIGHT * demand_factor)
}

/// Score a single listing.
pub fn score_job(
    profile: &UserProfile,
    job: &JobListing,
    popularity: &PopularityIndex,
) -> ScoredRecommendation {
    let content = score_content(profile, job);
    let collaborative_score = popularity.score(job.identifier());
    let final_score = blend_scores(content.content_score, collaborative_score, job.demand_score);

    ScoredRecommendation {
        listing: job.clone(),
        content_score: content.content_score,
        skill_score: content.skill_score,
        collaborative_score,
        recommendation_score: round2(final_score),
        already_applied: false,
    }
}

/// Rank `jobs` for `profile` and keep the best `top_n`.
///
/// Sorted by `recommendation_score` descending. The sort is stable, so
/// equal scores keep their input order. Empty inputs produce an empty or
/// neutrally scored result, never an error.
pub fn rank(
    profile: &UserProfile,
    jobs: &[JobListing],
    applications: Option<&[ApplicationRecord]>,
    top_n: usize,
) -> Vec<ScoredRecommendation> {
    let popularity = PopularityIndex::build(applications);

    let mut scored: Vec<ScoredRecommendation> = jobs
        .iter()
        .map(|job| score_job(profile, job, &popularity))
        .collect();

    scored.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    scored.truncate(top_n);

    debug!(
        candidates = jobs.len(),
        returned = scored.len(),
        top_score = scored.first().map(|r| r.recommendation_score),
        "ranking complete"
    );

    scored
}

/// Flag recommendations whose listing title or id is in `applied`
/// (lowercased). Scores and order are left untouched.
pub fn mark_applied(recommendations: &mut [ScoredRecommendation], applied: &HashSet<String>) {
    for rec in recommendations.iter_mut() {
        rec.already_applied = rec.listing.applied_in(applied);
    }
}
