// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A historical application. Only consumed in aggregate by the
/// collaborative scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub username: String,
    /// Listing title or id, matched exactly against `JobListing::identifier`.
    #[serde(alias = "job_title")]
    pub job_identifier: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
    pub fn new(username: &str, job_identifier: &str) -> Self {
        Self {
            username: username.to_string(),
            job_identifier: job_identifier.to_string(),
            company: String::new(),
            location: String::new(),
            applied_at: None,
        }
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = company.to_string();
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn applied_now(mut self) -> Self {
        self.applied_at = Some(Utc::now());
        self
    }
}
