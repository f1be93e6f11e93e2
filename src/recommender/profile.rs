// src/recommender/profile.rs
//! Typed user preferences and the profile value the scorers consume.
//!
//! Preferences are permissive: every field is optional and anything
//! missing or malformed falls back to its default. Building a profile
//! never fails.

use crate::utils::normalize_skill;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_MIN_STIPEND: i64 = 0;
pub const DEFAULT_MAX_STIPEND: i64 = 50_000;

/// Domain preference that accepts every category.
pub const ANY_DOMAIN: &str = "any";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Accepts `entry`, `Entry Level`, `entry_level`, etc. Unknown values
    /// read as `Entry`.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "intermediate" | "intermediate_level" | "mid" => Self::Intermediate,
            "advanced" | "advanced_level" | "senior" => Self::Advanced,
            _ => Self::Entry,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Entry => "entry",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// Preference fields collected from the user. Each `None` means "use the
/// default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub location: Option<String>,
    pub domain: Option<String>,
    pub min_stipend: Option<i64>,
    pub max_stipend: Option<i64>,
    pub remote: Option<bool>,
    pub experience: Option<String>,
}

impl UserPreferences {
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    pub fn with_stipend_range(mut self, min: i64, max: i64) -> Self {
        self.min_stipend = Some(min);
        self.max_stipend = Some(max);
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_experience(mut self, experience: &str) -> Self {
        self.experience = Some(experience.to_string());
        self
    }

    /// Fill every unset field of `self` from `fallback`.
    pub fn or(self, fallback: &UserPreferences) -> Self {
        Self {
            location: self.location.or_else(|| fallback.location.clone()),
            domain: self.domain.or_else(|| fallback.domain.clone()),
            min_stipend: self.min_stipend.or(fallback.min_stipend),
            max_stipend: self.max_stipend.or(fallback.max_stipend),
            remote: self.remote.or(fallback.remote),
            experience: self.experience.or_else(|| fallback.experience.clone()),
        }
    }

    /// Read preferences out of an untyped map. Keys with the wrong type
    /// are ignored rather than rejected.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| map.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let integer = |key: &str| {
            map.get(key).and_then(|v| match v {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
                serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            })
        };
        let flag = |key: &str| {
            map.get(key).and_then(|v| match v {
                serde_json::Value::Bool(b) => Some(*b),
                serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "yes" | "1" => Some(true),
                    "false" | "no" | "0" => Some(false),
                    _ => None,
                },
                _ => None,
            })
        };

        Self {
            location: text("location"),
            domain: text("domain"),
            min_stipend: integer("min_stipend"),
            max_stipend: integer("max_stipend"),
            remote: flag("remote"),
            experience: text("experience"),
        }
    }
}

/// Canonical, per-request profile. Built fresh for every recommendation
/// call and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// Lowercase, trimmed skill tokens
    pub skills: HashSet<String>,
    pub preferred_location: String,
    pub preferred_domain: String,
    pub min_stipend: i64,
    pub max_stipend: i64,
    pub remote_preference: bool,
    /// Carried for callers; no scoring component reads it.
    pub experience_level: ExperienceLevel,
}

/// Build a profile from raw skills and partial preferences.
pub fn build_profile<I, S>(skills: I, preferences: &UserPreferences) -> UserProfile
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let skills = skills
        .into_iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();

    UserProfile {
        skills,
        preferred_location: preferences.location.clone().unwrap_or_default(),
        preferred_domain: preferences.domain.clone().unwrap_or_default(),
        min_stipend: preferences.min_stipend.unwrap_or(DEFAULT_MIN_STIPEND),
        max_stipend: preferences.max_stipend.unwrap_or(DEFAULT_MAX_STIPEND),
        remote_preference: preferences.remote.unwrap_or(false),
        experience_level: preferences
            .experience
            .as_deref()
            .map(ExperienceLevel::parse_lenient)
            .unwrap_or_default(),
    }
}
