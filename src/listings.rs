// src/listings.rs
//! Loading and normalizing the scraped internship listings file.

use crate::demand::predict_demand;
use crate::types::JobListing;
use crate::utils::parse_bool_flag;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const UNKNOWN: &str = "Unknown";
/// Used when no row in the file carries a usable stipend.
pub const FALLBACK_STIPEND: u64 = 8000;

/// Every column is optional; normalization fills the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawListing {
    id: Option<String>,
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    category: Option<String>,
    description: Option<String>,
    stipend: Option<String>,
    skills_required: Option<String>,
    is_remote: Option<String>,
    demand_score: Option<String>,
    company_score: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number(value: Option<&String>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn to_stipend(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

/// Median of the parsed stipends, or the fallback when there are none.
fn median_stipend(values: &[f64]) -> u64 {
    if values.is_empty() {
        return FALLBACK_STIPEND;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    to_stipend(median)
}

/// Parse listings from any CSV source with a header row.
pub fn parse_listings<R: Read>(reader: R) -> Result<Vec<JobListing>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut raw_rows = Vec::new();
    for (index, result) in csv_reader.deserialize::<RawListing>().enumerate() {
        match result {
            Ok(row) => raw_rows.push(row),
            Err(e) => warn!("Skipping listing row {}: {}", index + 1, e),
        }
    }

    let parsed_stipends: Vec<f64> = raw_rows
        .iter()
        .filter_map(|row| parse_number(row.stipend.as_ref()))
        .collect();
    let default_stipend = median_stipend(&parsed_stipends);

    let listings = raw_rows
        .into_iter()
        .map(|row| {
            let stipend = parse_number(row.stipend.as_ref())
                .map(to_stipend)
                .unwrap_or(default_stipend);
            let is_remote = row.is_remote.as_deref().map(parse_bool_flag).unwrap_or(false);
            let demand = parse_number(row.demand_score.as_ref());
            let company_score = parse_number(row.company_score.as_ref()).unwrap_or(0.0);

            let title = present(row.title).unwrap_or_else(|| UNKNOWN.to_string());
            let location = present(row.location).unwrap_or_else(|| UNKNOWN.to_string());
            let demand_score = demand.unwrap_or_else(|| predict_demand(&title, &location));

            JobListing {
                id: present(row.id),
                company: present(row.company).unwrap_or_else(|| UNKNOWN.to_string()),
                category: present(row.category).unwrap_or_else(|| UNKNOWN.to_string()),
                description: row.description.unwrap_or_default(),
                skills_required: row.skills_required.unwrap_or_default(),
                title,
                location,
                stipend,
                is_remote,
                demand_score,
                company_score,
            }
        })
        .collect();

    Ok(listings)
}

/// Load listings from a CSV file on disk.
pub async fn load_listings(path: &Path) -> Result<Vec<JobListing>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read listings file: {}", path.display()))?;

    let listings = parse_listings(content.as_slice())
        .with_context(|| format!("Failed to parse listings file: {}", path.display()))?;

    info!("Loaded {} listings from {}", listings.len(), path.display());
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_rows() {
        let csv = "\
title,company,location,category,stipend,skills_required,is_remote,demand_score
Data Intern,Acme,Bangalore,Technology,15000,\"python, sql, react\",false,60
Web Intern,Globex,Remote,Technology,12000.6,\"html, css\",True,45.5
";
        let listings = parse_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.title, "Data Intern");
        assert_eq!(first.stipend, 15000);
        assert_eq!(first.skills_required, "python, sql, react");
        assert!(!first.is_remote);
        assert_eq!(first.demand_score, 60.0);
        assert_eq!(first.identifier(), "Data Intern");

        let second = &listings[1];
        assert_eq!(second.stipend, 12001);
        assert!(second.is_remote);
        assert_eq!(second.demand_score, 45.5);
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let csv = "\
title,stipend
Python Data Intern,
Marketing Intern,10000
Sales Intern,20000
";
        let listings = parse_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 3);

        let first = &listings[0];
        assert_eq!(first.company, "Unknown");
        assert_eq!(first.location, "Unknown");
        assert_eq!(first.category, "Unknown");
        assert_eq!(first.skills_required, "");
        // Median of 10000 and 20000
        assert_eq!(first.stipend, 15000);
        // Demand falls back to the keyword heuristic
        assert_eq!(first.demand_score, 70.0);
        assert_eq!(listings[1].demand_score, 0.0);
    }

    #[test]
    fn test_no_stipends_uses_fallback() {
        let csv = "title,company\nIntern,Acme\n";
        let listings = parse_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings[0].stipend, FALLBACK_STIPEND);
    }

    #[test]
    fn test_negative_stipend_floors_to_zero() {
        let csv = "title,stipend\nIntern,-500\n";
        let listings = parse_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings[0].stipend, 0);
    }

    #[test]
    fn test_id_column_becomes_identifier() {
        let csv = "id,title\njob-7,Backend Intern\n,Frontend Intern\n";
        let listings = parse_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings[0].identifier(), "job-7");
        assert_eq!(listings[1].identifier(), "Frontend Intern");
    }

    #[test]
    fn test_median_stipend() {
        assert_eq!(median_stipend(&[]), FALLBACK_STIPEND);
        assert_eq!(median_stipend(&[5000.0]), 5000);
        assert_eq!(median_stipend(&[9000.0, 1000.0, 5000.0]), 5000);
        assert_eq!(median_stipend(&[1000.0, 2000.0]), 1500);
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let result = load_listings(Path::new("definitely/not/here.csv")).await;
        assert!(result.is_err());
    }
}
