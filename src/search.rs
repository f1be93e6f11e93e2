// src/search.rs
//! Keyword search over listing descriptions, ordered by a simple
//! stipend/company/remote score.

use crate::types::JobListing;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Comma separated keywords. Empty matches everything.
    pub keywords: String,
    /// Case-insensitive location filter. Empty or "All" disables it.
    pub city: Option<String>,
    /// Lowercased titles or ids the user already applied to.
    #[serde(default)]
    pub applied_titles: HashSet<String>,
}

impl SearchQuery {
    pub fn new(keywords: &str) -> Self {
        Self {
            keywords: keywords.to_string(),
            ..Default::default()
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn with_applied_titles(mut self, titles: HashSet<String>) -> Self {
        self.applied_titles = titles;
        self
    }

    fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    fn city_filter(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "all")
    }
}

/// Whether `applied` (lowercased titles or ids) covers this listing.
pub fn is_applied(job: &JobListing, applied: &HashSet<String>) -> bool {
    job.applied_in(applied)
}

/// Ordering score for search results.
pub fn basic_score(job: &JobListing) -> f64 {
    let remote = if job.is_remote { 5.0 } else { 0.0 };
    job.stipend as f64 * 0.01 + job.company_score * 10.0 + remote
}

/// Matching listings, best first. Ties keep input order.
pub fn search_listings<'a>(listings: &'a [JobListing], query: &SearchQuery) -> Vec<&'a JobListing> {
    let keywords = query.keyword_list();
    let city = query.city_filter();

    let mut results: Vec<&JobListing> = listings
        .iter()
        .filter(|job| {
            if keywords.is_empty() {
                return true;
            }
            let description = job.description.to_lowercase();
            keywords.iter().any(|k| description.contains(k.as_str()))
        })
        .filter(|job| match &city {
            Some(city) => job.location.to_lowercase().contains(city.as_str()),
            None => true,
        })
        .filter(|job| !is_applied(job, &query.applied_titles))
        .collect();

    results.sort_by(|a, b| basic_score(b).total_cmp(&basic_score(a)));
    results
}

/// Zero-based page of `items`. Out of range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Vec<JobListing> {
        vec![
            JobListing::new("Data Intern", "Acme", "Bangalore", "Technology")
                .with_stipend(10_000)
                .with_description("Work with Python and SQL pipelines"),
            JobListing::new("Web Intern", "Globex", "Remote", "Technology")
                .with_stipend(10_000)
                .with_remote(true)
                .with_description("React front-end work"),
            JobListing::new("Finance Intern", "Initech", "Mumbai", "Finance")
                .with_stipend(20_000)
                .with_company_score(1.0)
                .with_description("Excel modelling"),
        ]
    }

    fn titles(results: &[&JobListing]) -> Vec<String> {
        results.iter().map(|j| j.title.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_all_sorted() {
        let data = listings();
        let results = search_listings(&data, &SearchQuery::default());
        assert_eq!(
            titles(&results),
            vec!["Finance Intern", "Web Intern", "Data Intern"]
        );
    }

    #[test]
    fn test_keyword_matches_description() {
        let data = listings();
        let results = search_listings(&data, &SearchQuery::new("python, excel"));
        assert_eq!(titles(&results), vec!["Finance Intern", "Data Intern"]);

        let none = search_listings(&data, &SearchQuery::new("haskell"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_city_filter() {
        let data = listings();
        let results = search_listings(&data, &SearchQuery::new("").with_city("bangalore"));
        assert_eq!(titles(&results), vec!["Data Intern"]);

        let all = search_listings(&data, &SearchQuery::new("").with_city("All"));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_applied_titles_are_excluded() {
        let data = listings();
        let applied: HashSet<String> = ["web intern".to_string()].into_iter().collect();
        let results = search_listings(&data, &SearchQuery::new("").with_applied_titles(applied));
        assert_eq!(titles(&results), vec!["Finance Intern", "Data Intern"]);
    }

    #[test]
    fn test_listing_applied_by_id_is_excluded() {
        let data = vec![
            JobListing::new("Backend Intern", "Acme", "Pune", "Technology").with_id("job-7"),
            JobListing::new("Frontend Intern", "Acme", "Pune", "Technology").with_id("job-8"),
        ];
        let applied: HashSet<String> = [data[0].identifier().to_lowercase()].into_iter().collect();
        let results = search_listings(&data, &SearchQuery::new("").with_applied_titles(applied));
        assert_eq!(titles(&results), vec!["Frontend Intern"]);
    }

    #[test]
    fn test_is_applied_matches_title_or_id() {
        let job = JobListing::new("Backend Intern", "Acme", "Pune", "Technology").with_id("JOB-7");
        let by_title: HashSet<String> = ["backend intern".to_string()].into_iter().collect();
        let by_id: HashSet<String> = ["job-7".to_string()].into_iter().collect();
        let other: HashSet<String> = ["job-8".to_string()].into_iter().collect();
        assert!(is_applied(&job, &by_title));
        assert!(is_applied(&job, &by_id));
        assert!(!is_applied(&job, &other));
    }

    #[test]
    fn test_basic_score() {
        let data = listings();
        assert_eq!(basic_score(&data[0]), 100.0);
        assert_eq!(basic_score(&data[1]), 105.0);
        assert_eq!(basic_score(&data[2]), 210.0);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(&items, 0, 10).len(), 10);
        assert_eq!(paginate(&items, 2, 10), &[20, 21, 22, 23, 24]);
        assert!(paginate(&items, 3, 10).is_empty());
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }
}
