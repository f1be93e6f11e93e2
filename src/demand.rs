// src/demand.rs
//! Fallback demand estimate for listings that arrive without one.

const DATA_KEYWORDS: [&str; 3] = ["data", "ai", "ml"];
const DATA_POINTS: f64 = 40.0;
const PYTHON_POINTS: f64 = 30.0;
const REMOTE_POINTS: f64 = 20.0;
const MAX_DEMAND: f64 = 100.0;

/// Keyword heuristic over title and location. Matching is plain
/// substring search, so "trainee" counts as an "ai" title.
pub fn predict_demand(title: &str, location: &str) -> f64 {
    let title = title.to_lowercase();
    let location = location.to_lowercase();

    let mut score = 0.0;
    if DATA_KEYWORDS.iter().any(|k| title.contains(k)) {
        score += DATA_POINTS;
    }
    if title.contains("python") {
        score += PYTHON_POINTS;
    }
    if location.contains("remote") {
        score += REMOTE_POINTS;
    }

    f64::min(score, MAX_DEMAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_demand() {
        assert_eq!(predict_demand("Marketing Intern", "Mumbai"), 0.0);
        assert_eq!(predict_demand("Data Analyst Intern", "Pune"), 40.0);
        assert_eq!(predict_demand("Python Developer", "Remote"), 50.0);
        assert_eq!(predict_demand("Python Data Intern", "Remote, India"), 90.0);
        assert_eq!(predict_demand("ML Engineer", "Bangalore"), 40.0);
    }
}
