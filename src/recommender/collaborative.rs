// src/recommender/collaborative.rs
//! Popularity score from aggregate application counts.
//!
//! A listing with no recorded applications, or a call with no history at
//! all, gets the neutral midpoint instead of zero.

use crate::types::ApplicationRecord;
use std::collections::HashMap;

/// Returned when there is no application evidence for a listing.
pub const NEUTRAL_COLLABORATIVE_SCORE: f64 = 50.0;
pub const POINTS_PER_APPLICATION: f64 = 2.0;
pub const MAX_COLLABORATIVE_SCORE: f64 = 100.0;

/// Score a single listing identifier against the raw history.
pub fn score_collaborative(job_identifier: &str, applications: Option<&[ApplicationRecord]>) -> f64 {
    match applications {
        Some(apps) if !apps.is_empty() => {
            let count = apps
                .iter()
                .filter(|app| app.job_identifier == job_identifier)
                .count();
            popularity_from_count(count)
        }
        _ => NEUTRAL_COLLABORATIVE_SCORE,
    }
}

fn popularity_from_count(count: usize) -> f64 {
    if count == 0 {
        return NEUTRAL_COLLABORATIVE_SCORE;
    }
    (count as f64 * POINTS_PER_APPLICATION).min(MAX_COLLABORATIVE_SCORE)
}

/// Application counts per identifier, built once per ranking call so
/// scoring N listings does not rescan the history N times.
#[derive(Debug, Clone, Default)]
pub struct PopularityIndex {
    counts: HashMap<String, usize>,
}

impl PopularityIndex {
    pub fn build(applications: Option<&[ApplicationRecord]>) -> Self {
        let Some(apps) = applications.filter(|apps| !apps.is_empty()) else {
            return Self::default();
        };

        let mut counts = HashMap::new();
        for app in apps {
            *counts.entry(app.job_identifier.clone()).or_insert(0) += 1;
        }

        Self { counts }
    }

    pub fn count(&self, job_identifier: &str) -> usize {
        self.counts.get(job_identifier).copied().unwrap_or(0)
    }

    /// Same result as `score_collaborative` over the indexed history.
    pub fn score(&self, job_identifier: &str) -> f64 {
        popularity_from_count(self.count(job_identifier))
    }
}
