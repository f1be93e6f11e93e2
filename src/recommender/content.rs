// src/recommender/content.rs
//! Content-based compatibility between a profile and a single listing.
//!
//! Component ceilings add up to exactly 100:
//! skills 40, location 20, domain 15, stipend 15, remote alignment 10.

use super::profile::{UserProfile, ANY_DOMAIN};
use crate::types::JobListing;
use tracing::debug;

pub const SKILL_WEIGHT: f64 = 40.0;
pub const LOCATION_MATCH_POINTS: f64 = 20.0;
pub const LOCATION_PARTIAL_POINTS: f64 = 10.0;
pub const DOMAIN_POINTS: f64 = 15.0;
pub const STIPEND_IN_RANGE_POINTS: f64 = 15.0;
pub const STIPEND_NEAR_MISS_POINTS: f64 = 10.0;
/// A stipend at or above this fraction of the minimum still earns partial credit.
pub const STIPEND_NEAR_MISS_RATIO: f64 = 0.8;
pub const REMOTE_ALIGNMENT_POINTS: f64 = 10.0;
pub const MAX_CONTENT_SCORE: f64 = 100.0;

/// Points awarded by each content component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBreakdown {
    pub skill_ratio: f64,
    pub skills: f64,
    pub location: f64,
    pub domain: f64,
    pub stipend: f64,
    pub remote: f64,
}

impl ContentBreakdown {
    pub fn sum(&self) -> f64 {
        self.skills + self.location + self.domain + self.stipend + self.remote
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentScore {
    /// 0-100
    pub content_score: f64,
    /// Skill overlap percentage, 0-100, reported unweighted
    pub skill_score: f64,
}

/// Score `job` against `profile`.
pub fn score_content(profile: &UserProfile, job: &JobListing) -> ContentScore {
    let breakdown = content_breakdown(profile, job);
    let content_score = breakdown.sum().min(MAX_CONTENT_SCORE);

    debug!(
        job = %job.identifier(),
        skills = breakdown.skills,
        location = breakdown.location,
        domain = breakdown.domain,
        stipend = breakdown.stipend,
        remote = breakdown.remote,
        "content score computed"
    );

    ContentScore {
        content_score,
        skill_score: breakdown.skill_ratio * 100.0,
    }
}

/// Per-component points, before the final clamp.
pub fn content_breakdown(profile: &UserProfile, job: &JobListing) -> ContentBreakdown {
    let skill_ratio = skill_overlap_ratio(profile, job);

    ContentBreakdown {
        skill_ratio,
        skills: skill_ratio * SKILL_WEIGHT,
        location: location_points(profile, job),
        domain: domain_points(profile, job),
        stipend: stipend_points(profile, job),
        remote: remote_points(profile, job),
    }
}

/// Fraction of the listing's required skills the profile covers.
/// A listing with no required skills yields 0.
pub fn skill_overlap_ratio(profile: &UserProfile, job: &JobListing) -> f64 {
    let job_skills = job.skill_set();
    if job_skills.is_empty() {
        return 0.0;
    }

    let matched = job_skills.intersection(&profile.skills).count();
    matched as f64 / job_skills.len() as f64
}

fn location_points(profile: &UserProfile, job: &JobListing) -> f64 {
    let preferred = profile.preferred_location.trim().to_lowercase();
    let location = job.location.trim().to_lowercase();

    if job.is_remote || (!preferred.is_empty() && location.contains(&preferred)) {
        LOCATION_MATCH_POINTS
    } else if !preferred.is_empty() && !location.is_empty() {
        LOCATION_PARTIAL_POINTS
    } else {
        0.0
    }
}

// An empty preference is a substring of every category, so it matches
// like the "any" sentinel.
fn domain_points(profile: &UserProfile, job: &JobListing) -> f64 {
    let preferred = profile.preferred_domain.trim().to_lowercase();
    if preferred == ANY_DOMAIN || job.category.to_lowercase().contains(&preferred) {
        DOMAIN_POINTS
    } else {
        0.0
    }
}

fn stipend_points(profile: &UserProfile, job: &JobListing) -> f64 {
    let stipend = job.stipend as f64;
    let min = profile.min_stipend as f64;
    let max = profile.max_stipend as f64;

    if min <= stipend && stipend <= max {
        STIPEND_IN_RANGE_POINTS
    } else if stipend >= STIPEND_NEAR_MISS_RATIO * min {
        STIPEND_NEAR_MISS_POINTS
    } else {
        0.0
    }
}

fn remote_points(profile: &UserProfile, job: &JobListing) -> f64 {
    if profile.remote_preference == job.is_remote {
        REMOTE_ALIGNMENT_POINTS
    } else {
        0.0
    }
}
