//! Relevance scoring of profile content against a job description

use crate::error::{Result, ResumeCuratorError};
use crate::job::JobDescription;
use crate::profile::{CandidateProfile, DateRange, Education, Experience, Project};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Identity of a scorable content unit. Entry indices follow the profile's
/// declared order, bullet indices the entry's declared order, so the same
/// profile always produces the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Experience { entry: usize },
    ExperienceBullet { entry: usize, bullet: usize },
    Project { entry: usize },
    ProjectBullet { entry: usize, bullet: usize },
    Education { entry: usize },
}

/// The entry a unit belongs to, for containment bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupId {
    Experience(usize),
    Project(usize),
    Education(usize),
}

impl ItemId {
    pub fn group(&self) -> GroupId {
        match *self {
            ItemId::Experience { entry } | ItemId::ExperienceBullet { entry, .. } => {
                GroupId::Experience(entry)
            }
            ItemId::Project { entry } | ItemId::ProjectBullet { entry, .. } => {
                GroupId::Project(entry)
            }
            ItemId::Education { entry } => GroupId::Education(entry),
        }
    }

    /// Ordering key matching the emission order of the scorer: experiences,
    /// then projects, then education, headers before their bullets.
    pub fn sort_key(&self) -> (u8, usize, usize) {
        match *self {
            ItemId::Experience { entry } => (0, entry, 0),
            ItemId::ExperienceBullet { entry, bullet } => (0, entry, bullet + 1),
            ItemId::Project { entry } => (1, entry, 0),
            ItemId::ProjectBullet { entry, bullet } => (1, entry, bullet + 1),
            ItemId::Education { entry } => (2, entry, 0),
        }
    }
}

/// Display payload carried alongside each scored unit so downstream stages
/// never have to re-read the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemContent {
    /// Entry header line; `detail` holds rewritable prose (project
    /// description).
    Header {
        heading: String,
        subheading: Option<String>,
        dates: String,
        detail: Option<String>,
    },
    /// A single bullet statement under a header.
    Bullet { text: String },
    /// A standalone entry selected as one unit (education, or an entry with
    /// no source bullets).
    Entry {
        heading: String,
        subheading: Option<String>,
        dates: String,
        detail: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: ItemId,
    pub content: ItemContent,
    pub score: f64,
    pub cost: u32,
}

/// Recency bonus parameters: items ending `age` years before the reference
/// year are boosted by `1 + max_bonus * decay^age`, capped at `1 + max_bonus`
/// for ongoing work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyConfig {
    pub decay: f64,
    pub max_bonus: f64,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            decay: 0.85,
            max_bonus: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub required_weight: f64,
    pub preferred_weight: f64,
    pub keyword_weight: f64,
    pub fuzzy_threshold: f64,
    pub recency: RecencyConfig,
    /// Year recency is measured against. Injected rather than read from the
    /// clock so scoring stays a pure function of its inputs.
    pub reference_year: i32,
}

impl ScorerConfig {
    pub fn for_year(reference_year: i32) -> Self {
        Self {
            required_weight: 3.0,
            preferred_weight: 2.0,
            keyword_weight: 1.0,
            fuzzy_threshold: 0.9,
            recency: RecencyConfig::default(),
            reference_year,
        }
    }
}

/// Scores every profile unit against the job's weighted vocabulary.
///
/// Required skills weigh more than preferred skills, preferred more than
/// generic keywords. Matching is case-insensitive and leftmost-longest, so
/// multi-word skills match as phrases. Identical inputs always produce the
/// identical sequence, in profile order.
pub struct RelevanceScorer {
    config: ScorerConfig,
}

struct TermMatcher {
    matcher: AhoCorasick,
    terms: Vec<String>,
    weights: Vec<f64>,
    fuzzy_threshold: f64,
}

impl RelevanceScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        profile: &CandidateProfile,
        job: &JobDescription,
    ) -> Result<Vec<ScoredItem>> {
        let matcher = self.build_matcher(job)?;
        let mut items = Vec::new();

        for (idx, exp) in profile.experiences.iter().enumerate() {
            self.score_experience(idx, exp, &matcher, &mut items);
        }
        for (idx, project) in profile.projects.iter().enumerate() {
            self.score_project(idx, project, &matcher, &mut items);
        }
        for (idx, edu) in profile.education.iter().enumerate() {
            items.push(self.score_education(idx, edu, &matcher));
        }

        Ok(items)
    }

    fn score_experience(
        &self,
        idx: usize,
        exp: &Experience,
        matcher: &TermMatcher,
        items: &mut Vec<ScoredItem>,
    ) {
        let recency = self.recency_multiplier(&exp.dates);
        let header_score = matcher.unit_score(&exp.title, &exp.tags) * recency;

        if exp.bullets.is_empty() {
            // Nothing to cap or trim; the entry is one atomic unit.
            items.push(ScoredItem {
                id: ItemId::Experience { entry: idx },
                content: ItemContent::Entry {
                    heading: exp.title.clone(),
                    subheading: Some(exp.company.clone()),
                    dates: exp.dates.display(),
                    detail: None,
                },
                score: header_score,
                cost: exp.header_cost(),
            });
            return;
        }

        items.push(ScoredItem {
            id: ItemId::Experience { entry: idx },
            content: ItemContent::Header {
                heading: exp.title.clone(),
                subheading: Some(exp.company.clone()),
                dates: exp.dates.display(),
                detail: None,
            },
            score: header_score,
            cost: exp.header_cost(),
        });

        for (bullet_idx, bullet) in exp.bullets.iter().enumerate() {
            items.push(ScoredItem {
                id: ItemId::ExperienceBullet {
                    entry: idx,
                    bullet: bullet_idx,
                },
                content: ItemContent::Bullet {
                    text: bullet.text.clone(),
                },
                score: matcher.unit_score(&bullet.text, &bullet.tags) * recency,
                cost: bullet.cost,
            });
        }
    }

    fn score_project(
        &self,
        idx: usize,
        project: &Project,
        matcher: &TermMatcher,
        items: &mut Vec<ScoredItem>,
    ) {
        let recency = self.recency_multiplier(&project.dates);
        let header_text = format!("{} {}", project.name, project.description);
        let header_score = matcher.unit_score(&header_text, &project.tags) * recency;
        let detail = if project.description.trim().is_empty() {
            None
        } else {
            Some(project.description.clone())
        };

        if project.bullets.is_empty() {
            items.push(ScoredItem {
                id: ItemId::Project { entry: idx },
                content: ItemContent::Entry {
                    heading: project.name.clone(),
                    subheading: None,
                    dates: project.dates.display(),
                    detail,
                },
                score: header_score,
                cost: project.header_cost(),
            });
            return;
        }

        items.push(ScoredItem {
            id: ItemId::Project { entry: idx },
            content: ItemContent::Header {
                heading: project.name.clone(),
                subheading: None,
                dates: project.dates.display(),
                detail,
            },
            score: header_score,
            cost: project.header_cost(),
        });

        for (bullet_idx, bullet) in project.bullets.iter().enumerate() {
            items.push(ScoredItem {
                id: ItemId::ProjectBullet {
                    entry: idx,
                    bullet: bullet_idx,
                },
                content: ItemContent::Bullet {
                    text: bullet.text.clone(),
                },
                score: matcher.unit_score(&bullet.text, &bullet.tags) * recency,
                cost: bullet.cost,
            });
        }
    }

    fn score_education(&self, idx: usize, edu: &Education, matcher: &TermMatcher) -> ScoredItem {
        let text = format!("{} {} {}", edu.degree, edu.school, edu.courses.join(" "));
        let score = matcher.unit_score(&text, &[]) * self.recency_multiplier(&edu.dates);

        let mut detail_parts = Vec::new();
        if let Some(grade) = &edu.grade {
            detail_parts.push(format!("Grade: {}", grade));
        }
        if !edu.courses.is_empty() {
            detail_parts.push(format!("Courses: {}", edu.courses.join(", ")));
        }

        ScoredItem {
            id: ItemId::Education { entry: idx },
            content: ItemContent::Entry {
                heading: edu.degree.clone(),
                subheading: Some(edu.school.clone()),
                dates: edu.dates.display(),
                detail: if detail_parts.is_empty() {
                    None
                } else {
                    Some(detail_parts.join(" | "))
                },
            },
            score,
            cost: edu.cost(),
        }
    }

    fn recency_multiplier(&self, dates: &DateRange) -> f64 {
        let age = match dates.end_year() {
            None => 0,
            Some(end) => (self.config.reference_year - end).max(0),
        };
        1.0 + self.config.recency.max_bonus * self.config.recency.decay.powi(age)
    }

    fn build_matcher(&self, job: &JobDescription) -> Result<TermMatcher> {
        let mut terms: Vec<String> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();

        let push_terms = |list: &[String], weight: f64, terms: &mut Vec<String>, weights: &mut Vec<f64>| {
            for term in list {
                if !terms.contains(term) {
                    terms.push(term.clone());
                    weights.push(weight);
                }
            }
        };

        push_terms(&job.required_skills, self.config.required_weight, &mut terms, &mut weights);
        push_terms(&job.preferred_skills, self.config.preferred_weight, &mut terms, &mut weights);
        push_terms(&job.keywords, self.config.keyword_weight, &mut terms, &mut weights);
        if let Some(seniority) = job.seniority {
            let term = seniority.as_str().to_string();
            if !terms.contains(&term) {
                terms.push(term);
                weights.push(self.config.keyword_weight);
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| {
                ResumeCuratorError::InvalidInput(format!("Failed to build term matcher: {}", e))
            })?;

        Ok(TermMatcher {
            matcher,
            terms,
            weights,
            fuzzy_threshold: self.config.fuzzy_threshold,
        })
    }
}

impl TermMatcher {
    /// Weighted overlap of one text unit (plus its tags) with the job
    /// vocabulary. Each term counts once per unit regardless of repetition.
    fn unit_score(&self, text: &str, tags: &[String]) -> f64 {
        let mut matched = vec![false; self.terms.len()];

        for mat in self.matcher.find_iter(text) {
            matched[mat.pattern().as_usize()] = true;
        }

        let mut score = 0.0;
        for (idx, hit) in matched.iter().enumerate() {
            if *hit {
                score += self.weights[idx];
            }
        }

        // Tags match whole terms, with a fuzzy fallback for near-miss
        // spellings ("nodejs" vs "node.js").
        for tag in tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            for (idx, term) in self.terms.iter().enumerate() {
                if matched[idx] {
                    continue;
                }
                if *term == tag {
                    matched[idx] = true;
                    score += self.weights[idx];
                } else {
                    let similarity = jaro_winkler(term, &tag);
                    if similarity >= self.fuzzy_threshold {
                        matched[idx] = true;
                        score += self.weights[idx] * similarity;
                    }
                }
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Bullet, DateRange, Metadata};

    fn job_with(required: &[&str], preferred: &[&str], keywords: &[&str]) -> JobDescription {
        JobDescription {
            title: "Backend Engineer".to_string(),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            seniority: None,
        }
    }

    fn experience(company: &str, end: Option<&str>, bullets: &[&str]) -> Experience {
        Experience {
            company: company.to_string(),
            title: "Engineer".to_string(),
            dates: DateRange {
                start: "2020".to_string(),
                end: end.map(|e| e.to_string()),
            },
            bullets: bullets.iter().map(|b| Bullet::new(*b)).collect(),
            tags: vec![],
        }
    }

    fn profile_with(experiences: Vec<Experience>) -> CandidateProfile {
        CandidateProfile {
            experiences,
            education: vec![],
            projects: vec![],
            metadata: Metadata {
                name: "Jane Doe".to_string(),
                email: Some("jane@example.com".to_string()),
                phone: None,
                location: None,
                linkedin: None,
                github: None,
                website: None,
                spoken_languages: vec![],
                extracurriculars: vec![],
            },
        }
    }

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(ScorerConfig::for_year(2025))
    }

    fn bullet_score(items: &[ScoredItem], entry: usize, bullet: usize) -> f64 {
        items
            .iter()
            .find(|i| i.id == ItemId::ExperienceBullet { entry, bullet })
            .unwrap()
            .score
    }

    #[test]
    fn test_required_skill_matches_case_insensitively() {
        let job = job_with(&["rust"], &[], &[]);
        let profile = profile_with(vec![experience(
            "Acme",
            Some("2024"),
            &["Built services in Rust", "Built services in Go"],
        )]);

        let items = scorer().score(&profile, &job).unwrap();
        assert!(bullet_score(&items, 0, 0) > bullet_score(&items, 0, 1));
        assert_eq!(bullet_score(&items, 0, 1), 0.0);
    }

    #[test]
    fn test_required_outweighs_preferred_outweighs_keyword() {
        let job = job_with(&["rust"], &["kubernetes"], &["testing"]);
        let profile = profile_with(vec![experience(
            "Acme",
            Some("2024"),
            &[
                "Deployed rust workloads",
                "Deployed kubernetes workloads",
                "Deployed testing workloads",
            ],
        )]);

        let items = scorer().score(&profile, &job).unwrap();
        let required = bullet_score(&items, 0, 0);
        let preferred = bullet_score(&items, 0, 1);
        let keyword = bullet_score(&items, 0, 2);
        assert!(required > preferred);
        assert!(preferred > keyword);
        assert!(keyword > 0.0);
    }

    #[test]
    fn test_multiword_skill_matches_as_phrase() {
        let job = job_with(&["machine learning"], &[], &[]);
        let profile = profile_with(vec![experience(
            "Acme",
            Some("2024"),
            &["Shipped machine learning pipelines", "Shipped learning material"],
        )]);

        let items = scorer().score(&profile, &job).unwrap();
        assert!(bullet_score(&items, 0, 0) > 0.0);
        assert_eq!(bullet_score(&items, 0, 1), 0.0);
    }

    #[test]
    fn test_recency_boosts_recent_work() {
        let job = job_with(&["rust"], &[], &[]);
        let profile = profile_with(vec![
            experience("Old Corp", Some("2015"), &["Wrote rust tooling"]),
            experience("New Corp", Some("2024"), &["Wrote rust tooling"]),
            experience("Now Corp", None, &["Wrote rust tooling"]),
        ]);

        let items = scorer().score(&profile, &job).unwrap();
        let old = bullet_score(&items, 0, 0);
        let recent = bullet_score(&items, 1, 0);
        let ongoing = bullet_score(&items, 2, 0);
        assert!(recent > old);
        assert!(ongoing >= recent);
        // Capped: never more than 1 + max_bonus over the raw weight.
        assert!(ongoing <= 3.0 * 1.5 + 1e-9);
    }

    #[test]
    fn test_tag_fuzzy_match() {
        let job = job_with(&["postgresql"], &[], &[]);
        let mut exp = experience("Acme", Some("2024"), &[]);
        exp.tags = vec!["postgresql".to_string()];
        let mut near = experience("Beta", Some("2024"), &[]);
        near.tags = vec!["postgresq".to_string()];
        let mut far = experience("Gamma", Some("2024"), &[]);
        far.tags = vec!["embedded firmware".to_string()];
        let profile = profile_with(vec![exp, near, far]);

        let items = scorer().score(&profile, &job).unwrap();
        let exact = items[0].score;
        let fuzzy = items[1].score;
        let none = items[2].score;
        assert!(exact > fuzzy);
        assert!(fuzzy > 0.0);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let job = job_with(&["rust", "tokio"], &["docker"], &["async"]);
        let profile = profile_with(vec![
            experience("Acme", Some("2024"), &["Async rust services on tokio"]),
            experience("Beta", Some("2021"), &["Docker orchestration"]),
        ]);

        let scorer = scorer();
        let first = scorer.score(&profile, &job).unwrap();
        let second = scorer.score(&profile, &job).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_emission_follows_profile_order() {
        let job = job_with(&["rust"], &[], &[]);
        let profile = profile_with(vec![
            experience("Acme", Some("2024"), &["a", "b"]),
            experience("Beta", Some("2023"), &["c"]),
        ]);

        let items = scorer().score(&profile, &job).unwrap();
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(
            ids,
            vec![
                ItemId::Experience { entry: 0 },
                ItemId::ExperienceBullet { entry: 0, bullet: 0 },
                ItemId::ExperienceBullet { entry: 0, bullet: 1 },
                ItemId::Experience { entry: 1 },
                ItemId::ExperienceBullet { entry: 1, bullet: 0 },
            ]
        );
    }

    #[test]
    fn test_entry_without_bullets_is_standalone() {
        let job = job_with(&["rust"], &[], &[]);
        let profile = profile_with(vec![experience("Acme", Some("2024"), &[])]);

        let items = scorer().score(&profile, &job).unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0].content, ItemContent::Entry { .. }));
    }
}
