// src/types/listing.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One internship row as loaded from the listings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub category: String,
    pub stipend: u64,
    /// Comma separated, free text. May be empty.
    pub skills_required: String,
    pub is_remote: bool,
    pub demand_score: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_score: f64,
}

impl JobListing {
    pub fn new(title: &str, company: &str, location: &str, category: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            stipend: 0,
            skills_required: String::new(),
            is_remote: false,
            demand_score: 0.0,
            description: String::new(),
            company_score: 0.0,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_stipend(mut self, stipend: u64) -> Self {
        self.stipend = stipend;
        self
    }

    pub fn with_skills(mut self, skills: &str) -> Self {
        self.skills_required = skills.to_string();
        self
    }

    pub fn with_remote(mut self, is_remote: bool) -> Self {
        self.is_remote = is_remote;
        self
    }

    pub fn with_demand_score(mut self, demand_score: f64) -> Self {
        self.demand_score = demand_score;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_company_score(mut self, company_score: f64) -> Self {
        self.company_score = company_score;
        self
    }

    /// Key used to match application history against this listing:
    /// the explicit id when one was supplied, the title otherwise.
    pub fn identifier(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => &self.title,
        }
    }

    /// Whether `applied` (lowercased titles or ids) covers this listing.
    pub fn applied_in(&self, applied: &HashSet<String>) -> bool {
        applied.contains(&self.title.to_lowercase())
            || applied.contains(&self.identifier().to_lowercase())
    }

    /// Required skills as lowercase, trimmed tokens. Empty tokens are dropped.
    pub fn skill_set(&self) -> HashSet<String> {
        crate::utils::split_skill_list(&self.skills_required)
    }
}
