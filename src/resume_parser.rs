// src/resume_parser.rs
//! Keyword based skill extraction from resume text.

use crate::utils::{read_file_content, validate_file_extension};
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

const SKILL_PATTERNS: [&str; 6] = [
    r"\b(python|java|javascript|c\+\+|c#|php|ruby|go|rust|kotlin|swift|scala|perl|lua)\b",
    r"\b(html|css|react|angular|vue|node\.js|express|django|flask|spring|hibernate)\b",
    r"\b(sql|mysql|postgresql|mongodb|redis|cassandra|elasticsearch)\b",
    r"\b(aws|azure|gcp|docker|kubernetes|jenkins|git|github|gitlab)\b",
    r"\b(machine learning|deep learning|ai|nlp|computer vision|tensorflow|pytorch|scikit-learn|pandas|numpy)\b",
    r"\b(data analysis|data science|statistics|r|matlab|tableau|power bi)\b",
];

pub const RESUME_EXTENSIONS: [&str; 2] = ["txt", "md"];

fn skill_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SKILL_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("skill pattern must compile"))
            .collect()
    })
}

/// Collect every vocabulary skill mentioned in `text`, lowercased.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    skill_patterns()
        .iter()
        .flat_map(|re| re.find_iter(&lowered).map(|m| m.as_str().to_string()))
        .collect()
}

/// Read a plain-text resume and extract its skills.
pub async fn extract_skills_from_file(path: &Path) -> Result<BTreeSet<String>> {
    validate_file_extension(&path.to_string_lossy(), &RESUME_EXTENSIONS)?;
    let text = read_file_content(path).await?;
    let skills = extract_skills(&text);
    info!(
        "Extracted {} skills from resume {}",
        skills.len(),
        path.display()
    );
    Ok(skills)
}
