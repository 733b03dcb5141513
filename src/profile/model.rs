//! Typed candidate profile records

use crate::metrics;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// All candidate data, loaded once per process and shared read-only across
/// curation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub metadata: Metadata,
}

/// A start/end pair of date strings. An absent end (or "Present"/"Current")
/// means the range is ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    pub fn start_year(&self) -> Option<i32> {
        parse_year(&self.start)
    }

    /// End year of the range; `None` while ongoing.
    pub fn end_year(&self) -> Option<i32> {
        if self.is_ongoing() {
            return None;
        }
        self.end.as_deref().and_then(parse_year)
    }

    pub fn is_ongoing(&self) -> bool {
        match self.end.as_deref() {
            None => true,
            Some(end) => matches!(
                end.trim().to_lowercase().as_str(),
                "present" | "current" | ""
            ),
        }
    }

    /// Display form, e.g. "2021 - Present".
    pub fn display(&self) -> String {
        let end = match self.end.as_deref() {
            Some(end) if !self.is_ongoing() => end.to_string(),
            _ => "Present".to_string(),
        };
        format!("{} - {}", self.start, end)
    }
}

/// Extract the last plausible year (1900-2099) mentioned in a date string.
/// Handles "2024", "Jun 2024", "2023 - 2024" and similar forms.
pub fn parse_year(text: &str) -> Option<i32> {
    let re = Regex::new(r"\b(19|20)\d{2}\b").ok()?;
    re.find_iter(text)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

/// One bullet statement, with its estimated space cost in lines and the
/// index-based identity it keeps within its parent entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub text: String,
    pub cost: u32,
    pub tags: Vec<String>,
}

impl Bullet {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cost = metrics::text_lines(&text);
        Self {
            text,
            cost,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub dates: DateRange,
    pub bullets: Vec<Bullet>,
    pub tags: Vec<String>,
}

impl Experience {
    /// Cost of the "Title at Company | dates" line alone.
    pub fn header_cost(&self) -> u32 {
        1
    }

    pub fn heading(&self) -> String {
        format!("{} at {}", self.title, self.company)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub dates: DateRange,
    pub grade: Option<String>,
    pub courses: Vec<String>,
}

impl Education {
    /// School + degree/date lines, plus wrapped course lines when present.
    pub fn cost(&self) -> u32 {
        let mut lines = 2;
        if !self.courses.is_empty() {
            let courses_text = format!("Courses: {}", self.courses.join(", "));
            lines += metrics::text_lines(&courses_text);
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub dates: DateRange,
    pub bullets: Vec<Bullet>,
    pub tags: Vec<String>,
}

impl Project {
    /// Name/date line plus the wrapped description.
    pub fn header_cost(&self) -> u32 {
        1 + metrics::text_lines(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub spoken_languages: Vec<String>,
    pub extracurriculars: Vec<String>,
}

impl Metadata {
    pub fn has_contact(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}
