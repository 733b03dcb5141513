//! Typed view of a parsed job description
//!
//! The raw posting is turned into this structure by an external normalizer;
//! this module only loads, normalizes and deduplicates it.

use crate::error::{Result, ResumeCuratorError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub keywords: Vec<String>,
    pub seniority: Option<Seniority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Staff,
    Principal,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid",
            Seniority::Senior => "senior",
            Seniority::Staff => "staff",
            Seniority::Principal => "principal",
        }
    }
}

/// Wire schema produced by the external job-posting normalizer.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobDescription {
    title: Option<String>,
    #[serde(default)]
    required_skills: Vec<String>,
    #[serde(default)]
    preferred_skills: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    seniority: Option<String>,
}

impl JobDescription {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawJobDescription = serde_json::from_str(content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawJobDescription) -> Result<Self> {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ResumeCuratorError::Validation(vec!["job.title: missing required field".into()])
            })?;

        let seniority = match raw.seniority.as_deref() {
            None => None,
            Some(s) => Some(parse_seniority(s)?),
        };

        Ok(Self {
            title: title.trim().to_string(),
            required_skills: normalize_terms(raw.required_skills),
            preferred_skills: normalize_terms(raw.preferred_skills),
            keywords: normalize_terms(raw.keywords),
            seniority,
        })
    }
}

fn parse_seniority(value: &str) -> Result<Seniority> {
    match value.trim().to_lowercase().as_str() {
        "junior" | "entry" => Ok(Seniority::Junior),
        "mid" | "intermediate" => Ok(Seniority::Mid),
        "senior" => Ok(Seniority::Senior),
        "staff" => Ok(Seniority::Staff),
        "principal" | "lead" => Ok(Seniority::Principal),
        other => Err(ResumeCuratorError::InvalidInput(format!(
            "Unknown seniority level: {} (expected junior, mid, senior, staff or principal)",
            other
        ))),
    }
}

/// Trim, lowercase and deduplicate a term list, preserving first-seen order.
pub fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_terms_dedups_and_lowercases() {
        let terms = vec![
            " Rust ".to_string(),
            "rust".to_string(),
            "PostgreSQL".to_string(),
            "".to_string(),
            "RUST".to_string(),
        ];
        assert_eq!(normalize_terms(terms), vec!["rust", "postgresql"]);
    }

    #[test]
    fn test_from_json_str() {
        let job = JobDescription::from_json_str(
            r#"{
                "title": "Backend Engineer",
                "requiredSkills": ["Rust", "rust", "Tokio"],
                "preferredSkills": ["Kubernetes"],
                "keywords": ["distributed systems"],
                "seniority": "Senior"
            }"#,
        )
        .unwrap();

        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.required_skills, vec!["rust", "tokio"]);
        assert_eq!(job.preferred_skills, vec!["kubernetes"]);
        assert_eq!(job.keywords, vec!["distributed systems"]);
        assert_eq!(job.seniority, Some(Seniority::Senior));
    }

    #[test]
    fn test_missing_title_rejected() {
        let err = JobDescription::from_json_str(r#"{"requiredSkills": ["rust"]}"#).unwrap_err();
        assert!(matches!(err, ResumeCuratorError::Validation(_)));
    }

    #[test]
    fn test_unknown_seniority_rejected() {
        let err = JobDescription::from_json_str(
            r#"{"title": "Dev", "seniority": "wizard"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ResumeCuratorError::InvalidInput(_)));
    }

    #[test]
    fn test_seniority_optional() {
        let job = JobDescription::from_json_str(r#"{"title": "Dev"}"#).unwrap();
        assert_eq!(job.seniority, None);
    }
}
