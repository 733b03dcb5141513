//! Assembly of the final intermediate resume model
//!
//! Pure merge of candidate metadata with an already-made selection; no
//! selection logic happens here. The produced `ResumeDocument` is handed to
//! an external renderer, which must not select or truncate further.

use crate::curate::scorer::{GroupId, ItemContent, ScoredItem};
use crate::curate::selector::SelectionResult;
use crate::error::{Result, ResumeCuratorError};
use crate::job::JobDescription;
use crate::profile::model::parse_year;
use crate::profile::{CandidateProfile, Metadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub header: DocumentHeader,
    pub sections: Vec<DocumentSection>,
    pub totals: DocumentTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub title: String,
    pub entries: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub heading: String,
    pub subheading: Option<String>,
    pub dates: Option<String>,
    pub detail: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub space_cost: u64,
    pub budget: i64,
    pub relevance: f64,
}

/// Skills block recovered from the job vocabulary and the candidate's tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsSummary {
    pub skills: Vec<String>,
    pub spoken_languages: Vec<String>,
}

/// Skills the candidate can honestly claim for this job: job-required and
/// preferred terms present in the candidate's own tags or text. When the job
/// names no skills, fall back to the candidate's first distinct tags.
pub fn skills_summary(profile: &CandidateProfile, job: &JobDescription) -> SkillsSummary {
    let mut candidate_tags: Vec<String> = Vec::new();
    let mut candidate_text = String::new();
    for exp in &profile.experiences {
        candidate_tags.extend(exp.tags.iter().cloned());
        for bullet in &exp.bullets {
            candidate_text.push_str(&bullet.text.to_lowercase());
            candidate_text.push(' ');
        }
    }
    for project in &profile.projects {
        candidate_tags.extend(project.tags.iter().cloned());
        candidate_text.push_str(&project.description.to_lowercase());
        candidate_text.push(' ');
    }

    let mut skills: Vec<String> = Vec::new();
    for term in job.required_skills.iter().chain(job.preferred_skills.iter()) {
        if candidate_tags.iter().any(|t| t == term) || candidate_text.contains(term.as_str()) {
            skills.push(term.clone());
        }
    }

    if skills.is_empty() {
        let mut seen = std::collections::HashSet::new();
        skills = candidate_tags
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .take(9)
            .collect();
    }

    SkillsSummary {
        skills,
        spoken_languages: profile.metadata.spoken_languages.clone(),
    }
}

#[derive(Default)]
pub struct ResumeAssembler {
    skills: Option<SkillsSummary>,
}

impl ResumeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skills(skills: SkillsSummary) -> Self {
        Self {
            skills: Some(skills),
        }
    }

    pub fn assemble(
        &self,
        metadata: &Metadata,
        selection: &SelectionResult,
    ) -> Result<ResumeDocument> {
        if metadata.name.trim().is_empty() {
            return Err(ResumeCuratorError::IncompleteProfile(
                "candidate name is missing".to_string(),
            ));
        }
        if !metadata.has_contact() {
            return Err(ResumeCuratorError::IncompleteProfile(format!(
                "no contact method for {} (need email or phone)",
                metadata.name
            )));
        }

        let mut experiences = collect_entries(&selection.items, |g| {
            matches!(g, GroupId::Experience(_))
        });
        let projects = collect_entries(&selection.items, |g| matches!(g, GroupId::Project(_)));
        let education = collect_entries(&selection.items, |g| matches!(g, GroupId::Education(_)));

        // Most recent first for display; selection already decided what made
        // the cut.
        experiences.sort_by_key(|entry| std::cmp::Reverse(end_rank(entry.dates.as_deref())));

        let mut sections = Vec::new();
        push_section(&mut sections, "Experience", experiences);
        push_section(&mut sections, "Projects", projects);
        push_section(&mut sections, "Education", education);

        if let Some(skills) = &self.skills {
            let mut entries = Vec::new();
            if !skills.skills.is_empty() {
                entries.push(DocumentEntry {
                    heading: "Technical".to_string(),
                    subheading: None,
                    dates: None,
                    detail: Some(skills.skills.join(", ")),
                    bullets: vec![],
                });
            }
            if !skills.spoken_languages.is_empty() {
                entries.push(DocumentEntry {
                    heading: "Languages".to_string(),
                    subheading: None,
                    dates: None,
                    detail: Some(skills.spoken_languages.join(", ")),
                    bullets: vec![],
                });
            }
            push_section(&mut sections, "Skills", entries);
        }

        if !metadata.extracurriculars.is_empty() {
            push_section(
                &mut sections,
                "Extracurriculars",
                vec![DocumentEntry {
                    heading: "Extracurriculars".to_string(),
                    subheading: None,
                    dates: None,
                    detail: None,
                    bullets: metadata.extracurriculars.clone(),
                }],
            );
        }

        Ok(ResumeDocument {
            header: DocumentHeader {
                name: metadata.name.clone(),
                email: metadata.email.clone(),
                phone: metadata.phone.clone(),
                location: metadata.location.clone(),
                linkedin: metadata.linkedin.clone(),
                github: metadata.github.clone(),
                website: metadata.website.clone(),
            },
            sections,
            totals: DocumentTotals {
                space_cost: selection.total_cost,
                budget: selection.budget,
                relevance: selection.total_score,
            },
        })
    }
}

fn collect_entries(
    items: &[ScoredItem],
    belongs: impl Fn(GroupId) -> bool,
) -> Vec<DocumentEntry> {
    let mut entries: Vec<DocumentEntry> = Vec::new();

    for item in items {
        if !belongs(item.id.group()) {
            continue;
        }
        match &item.content {
            ItemContent::Header {
                heading,
                subheading,
                dates,
                detail,
            }
            | ItemContent::Entry {
                heading,
                subheading,
                dates,
                detail,
            } => {
                entries.push(DocumentEntry {
                    heading: heading.clone(),
                    subheading: subheading.clone(),
                    dates: Some(dates.clone()),
                    detail: detail.clone(),
                    bullets: vec![],
                });
            }
            ItemContent::Bullet { text } => {
                // Items arrive header-first per entry; a bullet always has
                // its entry already in place.
                if let Some(entry) = entries.last_mut() {
                    entry.bullets.push(text.clone());
                }
            }
        }
    }

    entries
}

fn push_section(sections: &mut Vec<DocumentSection>, title: &str, entries: Vec<DocumentEntry>) {
    if !entries.is_empty() {
        sections.push(DocumentSection {
            title: title.to_string(),
            entries,
        });
    }
}

/// Sort rank for "most recent first": ongoing ranges beat any year.
fn end_rank(dates: Option<&str>) -> i32 {
    match dates {
        Some(dates) if dates.to_lowercase().contains("present") => i32::MAX,
        Some(dates) => parse_year(dates).unwrap_or(0),
        None => 0,
    }
}
