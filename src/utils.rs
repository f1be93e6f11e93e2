// src/utils.rs
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Normalize a single skill token for set comparisons
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Split a comma separated skill list into normalized, non-empty tokens
pub fn split_skill_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(normalize_skill)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize a username for case-insensitive lookups
pub fn normalize_username(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse the loose boolean spellings found in scraped data.
/// Anything unrecognized reads as false.
pub fn parse_bool_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "t"
    )
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Read file content as string with proper error context
pub async fn read_file_content(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Ensure the parent directory of a file exists
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}
