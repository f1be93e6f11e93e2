// src/analytics.rs
//! Aggregate views over listings and application history: the admin
//! dashboard numbers and a single user's application summary.

use crate::types::{ApplicationRecord, JobListing};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const TOP_ENTRIES: usize = 10;
pub const RECENT_APPLICATIONS: usize = 10;

/// Keywords looked for in listing descriptions for the skill demand chart.
pub const TRACKED_SKILLS: [&str; 14] = [
    "python",
    "java",
    "sql",
    "machine learning",
    "data science",
    "ai",
    "react",
    "django",
    "flask",
    "aws",
    "docker",
    "html",
    "css",
    "javascript",
];

/// Upper bound (inclusive) and label of each stipend bucket. The last
/// bucket is open-ended.
const STIPEND_BUCKETS: [(u64, &str); 5] = [
    (5_000, "<5K"),
    (10_000, "5-10K"),
    (15_000, "10-15K"),
    (20_000, "15-20K"),
    (u64::MAX, "20K+"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_internships: usize,
    pub total_applications: usize,
    pub unique_students: usize,
    /// Mean stipend, truncated. 0 with no listings.
    pub average_stipend: u64,
    /// Newest first.
    pub recent_applications: Vec<ApplicationRecord>,
    /// From applications when there are any, otherwise from listings.
    pub top_companies: Vec<CountEntry>,
    pub top_locations: Vec<CountEntry>,
    pub skill_demand: Vec<CountEntry>,
    pub stipend_distribution: Vec<CountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserApplicationSummary {
    pub total: usize,
    pub companies_applied: usize,
    pub last_applied: Option<NaiveDate>,
    /// Newest first.
    pub applications: Vec<ApplicationRecord>,
}

/// Count non-empty labels, most frequent first. Ties keep first-seen order.
pub fn value_counts<'a, I>(labels: I, limit: usize) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut entries: Vec<CountEntry> = order
        .into_iter()
        .map(|label| CountEntry {
            label: label.to_string(),
            count: counts[label],
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

/// How many listing descriptions mention each tracked skill. Skills
/// nobody mentions are left out.
pub fn skill_demand(listings: &[JobListing]) -> Vec<CountEntry> {
    let descriptions: Vec<String> = listings
        .iter()
        .map(|job| job.description.to_lowercase())
        .collect();

    let mut entries: Vec<CountEntry> = TRACKED_SKILLS
        .iter()
        .map(|skill| CountEntry {
            label: skill.to_string(),
            count: descriptions.iter().filter(|d| d.contains(skill)).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Listings per stipend bucket, in bucket order, empty buckets included.
pub fn stipend_distribution(listings: &[JobListing]) -> Vec<CountEntry> {
    let mut counts = [0usize; STIPEND_BUCKETS.len()];
    for job in listings {
        if let Some(idx) = STIPEND_BUCKETS
            .iter()
            .position(|(upper, _)| job.stipend <= *upper)
        {
            counts[idx] += 1;
        }
    }

    STIPEND_BUCKETS
        .iter()
        .zip(counts)
        .map(|((_, label), count)| CountEntry {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn newest_first(applications: &[ApplicationRecord]) -> Vec<ApplicationRecord> {
    let mut sorted = applications.to_vec();
    // `None` sorts below any timestamp, so undated rows end up last.
    sorted.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    sorted
}

pub fn dashboard_stats(
    listings: &[JobListing],
    applications: &[ApplicationRecord],
) -> DashboardStats {
    let unique_students = applications
        .iter()
        .map(|app| app.username.as_str())
        .collect::<HashSet<_>>()
        .len();

    let average_stipend = if listings.is_empty() {
        0
    } else {
        listings.iter().map(|job| job.stipend).sum::<u64>() / listings.len() as u64
    };

    let mut recent_applications = newest_first(applications);
    recent_applications.truncate(RECENT_APPLICATIONS);

    let (top_companies, top_locations) = if applications.is_empty() {
        (
            value_counts(listings.iter().map(|j| j.company.as_str()), TOP_ENTRIES),
            value_counts(listings.iter().map(|j| j.location.as_str()), TOP_ENTRIES),
        )
    } else {
        (
            value_counts(applications.iter().map(|a| a.company.as_str()), TOP_ENTRIES),
            value_counts(applications.iter().map(|a| a.location.as_str()), TOP_ENTRIES),
        )
    };

    DashboardStats {
        total_internships: listings.len(),
        total_applications: applications.len(),
        unique_students,
        average_stipend,
        recent_applications,
        top_companies,
        top_locations,
        skill_demand: skill_demand(listings),
        stipend_distribution: stipend_distribution(listings),
    }
}

/// Summary of one user's applications. Callers pass only that user's rows.
pub fn user_summary(applications: &[ApplicationRecord]) -> UserApplicationSummary {
    let companies_applied = applications
        .iter()
        .map(|app| app.company.trim())
        .filter(|company| !company.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let last_applied = applications
        .iter()
        .filter_map(|app| app.applied_at)
        .max()
        .map(|at| at.date_naive());

    UserApplicationSummary {
        total: applications.len(),
        companies_applied,
        last_applied,
        applications: newest_first(applications),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn listing(company: &str, location: &str, stipend: u64, description: &str) -> JobListing {
        JobListing::new("Intern", company, location, "Technology")
            .with_stipend(stipend)
            .with_description(description)
    }

    fn application(user: &str, title: &str, company: &str, day: Option<u32>) -> ApplicationRecord {
        let mut app = ApplicationRecord::new(user, title)
            .with_company(company)
            .with_location("Pune");
        app.applied_at = day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).unwrap());
        app
    }

    fn labels(entries: &[CountEntry]) -> Vec<(&str, usize)> {
        entries.iter().map(|e| (e.label.as_str(), e.count)).collect()
    }

    #[test]
    fn test_value_counts_orders_by_count_then_first_seen() {
        let counts = value_counts(["b", "a", "", "a", "c", "b", " "], 10);
        assert_eq!(labels(&counts), vec![("b", 2), ("a", 2), ("c", 1)]);

        let limited = value_counts(["x", "y", "y"], 1);
        assert_eq!(labels(&limited), vec![("y", 2)]);
    }

    #[test]
    fn test_stipend_distribution_buckets() {
        let listings = vec![
            listing("A", "Pune", 0, ""),
            listing("A", "Pune", 5_000, ""),
            listing("A", "Pune", 5_001, ""),
            listing("A", "Pune", 15_000, ""),
            listing("A", "Pune", 90_000, ""),
        ];
        let dist = stipend_distribution(&listings);
        assert_eq!(
            labels(&dist),
            vec![("<5K", 2), ("5-10K", 1), ("10-15K", 1), ("15-20K", 0), ("20K+", 1)]
        );
    }

    #[test]
    fn test_skill_demand_counts_descriptions() {
        let listings = vec![
            listing("A", "Pune", 0, "Python and SQL"),
            listing("A", "Pune", 0, "python scripting"),
            listing("A", "Pune", 0, "Excel only"),
        ];
        let demand = skill_demand(&listings);
        assert_eq!(labels(&demand), vec![("python", 2), ("sql", 1)]);
    }

    #[test]
    fn test_dashboard_uses_applications_when_present() {
        let listings = vec![
            listing("Acme", "Bangalore", 10_000, "python"),
            listing("Globex", "Mumbai", 21_000, "react"),
        ];
        let apps = vec![
            application("asha", "Data Intern", "Globex", Some(1)),
            application("ravi", "Data Intern", "Globex", Some(3)),
            application("asha", "Web Intern", "Acme", None),
        ];

        let stats = dashboard_stats(&listings, &apps);
        assert_eq!(stats.total_internships, 2);
        assert_eq!(stats.total_applications, 3);
        assert_eq!(stats.unique_students, 2);
        assert_eq!(stats.average_stipend, 15_500);
        assert_eq!(labels(&stats.top_companies), vec![("Globex", 2), ("Acme", 1)]);
        assert_eq!(labels(&stats.top_locations), vec![("Pune", 3)]);

        let recent: Vec<_> = stats
            .recent_applications
            .iter()
            .map(|a| a.username.as_str())
            .collect();
        assert_eq!(recent, vec!["ravi", "asha", "asha"]);
        assert_eq!(stats.recent_applications[2].applied_at, None);
    }

    #[test]
    fn test_dashboard_falls_back_to_listings() {
        let listings = vec![
            listing("Acme", "Bangalore", 1_000, ""),
            listing("Acme", "Mumbai", 2_000, ""),
        ];
        let stats = dashboard_stats(&listings, &[]);
        assert_eq!(stats.unique_students, 0);
        assert!(stats.recent_applications.is_empty());
        assert_eq!(labels(&stats.top_companies), vec![("Acme", 2)]);
        assert_eq!(
            labels(&stats.top_locations),
            vec![("Bangalore", 1), ("Mumbai", 1)]
        );

        let empty = dashboard_stats(&[], &[]);
        assert_eq!(empty.average_stipend, 0);
        assert!(empty.skill_demand.is_empty());
    }

    #[test]
    fn test_user_summary() {
        let apps = vec![
            application("asha", "Data Intern", "Acme", Some(2)),
            application("asha", "Web Intern", "Acme", Some(7)),
            application("asha", "Ops Intern", "", None),
        ];
        let summary = user_summary(&apps);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.companies_applied, 1);
        assert_eq!(summary.last_applied, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(summary.applications[0].job_identifier, "Web Intern");
        assert_eq!(summary.applications[2].job_identifier, "Ops Intern");

        let none = user_summary(&[]);
        assert_eq!(none.total, 0);
        assert_eq!(none.last_applied, None);
    }
}
