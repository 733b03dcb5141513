//! The curation pipeline
//!
//! One run per (profile, job) pair: score, select, optionally optimize,
//! assemble. Stages run sequentially; the profile is borrowed read-only, so
//! independent runs can execute in parallel without coordination. Scoring,
//! selection and assembly fail fast; text optimization is best-effort and
//! never load-bearing.

pub mod assembler;
pub mod scorer;
pub mod selector;

pub use assembler::{skills_summary, ResumeAssembler, ResumeDocument, SkillsSummary};
pub use scorer::{
    ItemContent, ItemId, RecencyConfig, RelevanceScorer, ScoredItem, ScorerConfig,
};
pub use selector::{ContentSelector, SelectionResult, SelectionStatus, SelectorConfig};

use crate::error::{Result, ResumeCuratorError};
use crate::job::JobDescription;
use crate::optimize::TextOptimizer;
use crate::profile::CandidateProfile;
use log::{info, warn};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CurationOptions {
    /// Page budget expressed in lines.
    pub budget: i64,
    pub scorer: ScorerConfig,
    pub selector: SelectorConfig,
    /// Upper bound on the whole optimization stage, covering the remote
    /// optimizer's retry.
    pub optimizer_timeout: Duration,
}

/// Everything a caller needs to present the outcome of one run.
#[derive(Debug, Clone)]
pub struct CurationReport {
    pub document: ResumeDocument,
    pub status: SelectionStatus,
    pub selected_items: usize,
    pub total_cost: u64,
    pub total_score: f64,
    pub budget: i64,
    pub optimizer: String,
    pub warnings: Vec<String>,
}

pub struct Curator {
    options: CurationOptions,
    optimizer: Box<dyn TextOptimizer>,
}

impl Curator {
    pub fn new(options: CurationOptions, optimizer: Box<dyn TextOptimizer>) -> Self {
        Self { options, optimizer }
    }

    pub async fn run(
        &self,
        profile: &CandidateProfile,
        job: &JobDescription,
    ) -> Result<CurationReport> {
        // Checked up front so a bad budget never triggers scoring work.
        if self.options.budget <= 0 {
            return Err(ResumeCuratorError::InvalidBudget(self.options.budget));
        }

        let scorer = RelevanceScorer::new(self.options.scorer.clone());
        let items = scorer.score(profile, job)?;
        info!("Scored {} content units against '{}'", items.len(), job.title);

        let selector = ContentSelector::new(self.options.selector.clone());
        let selection = selector.select(&items, self.options.budget)?;
        match selection.status {
            SelectionStatus::Complete => info!(
                "Selected {} units, {} of {} lines",
                selection.items.len(),
                selection.total_cost,
                selection.budget
            ),
            SelectionStatus::BudgetTooSmall => warn!(
                "No content fits within {} lines; producing an empty document",
                selection.budget
            ),
        }

        let mut warnings = Vec::new();
        let selection = self.optimize(&selection, job, &mut warnings).await;

        let assembler = ResumeAssembler::with_skills(skills_summary(profile, job));
        let document = assembler.assemble(&profile.metadata, &selection)?;

        Ok(CurationReport {
            status: selection.status,
            selected_items: selection.items.len(),
            total_cost: selection.total_cost,
            total_score: selection.total_score,
            budget: selection.budget,
            optimizer: self.optimizer.name().to_string(),
            warnings,
            document,
        })
    }

    /// Run the optimizer with a hard timeout. Any failure keeps the
    /// unoptimized selection; correctness never depends on this stage.
    async fn optimize(
        &self,
        selection: &SelectionResult,
        job: &JobDescription,
        warnings: &mut Vec<String>,
    ) -> SelectionResult {
        let attempt = tokio::time::timeout(
            self.options.optimizer_timeout,
            self.optimizer.optimize(selection, job),
        )
        .await;

        match attempt {
            Ok(Ok(optimized)) => {
                if optimized.total_cost > selection.budget as u64 {
                    let message = format!(
                        "optimizer output would use {} of {} lines; keeping original text",
                        optimized.total_cost, selection.budget
                    );
                    warn!("{}", message);
                    warnings.push(message);
                    selection.clone()
                } else {
                    optimized
                }
            }
            Ok(Err(e)) => {
                let message = format!("text optimization skipped: {}", e);
                warn!("{}", message);
                warnings.push(message);
                selection.clone()
            }
            Err(_) => {
                let message = format!(
                    "text optimization timed out after {:?}; keeping original text",
                    self.options.optimizer_timeout
                );
                warn!("{}", message);
                warnings.push(message);
                selection.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::{IdentityOptimizer, MockOptimizer};
    use crate::profile::{Bullet, DateRange, Experience, Metadata};

    fn profile() -> CandidateProfile {
        CandidateProfile {
            experiences: vec![Experience {
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                dates: DateRange {
                    start: "2021".to_string(),
                    end: None,
                },
                bullets: vec![
                    Bullet::new("Built rust services"),
                    Bullet::new("Maintained CI"),
                ],
                tags: vec!["rust".to_string()],
            }],
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

    fn job() -> JobDescription {
        JobDescription {
            title: "Backend Engineer".to_string(),
            required_skills: vec!["rust".to_string()],
            preferred_skills: vec![],
            keywords: vec![],
            seniority: None,
        }
    }

    fn options(budget: i64) -> CurationOptions {
        CurationOptions {
            budget,
            scorer: ScorerConfig::for_year(2025),
            selector: SelectorConfig::default(),
            optimizer_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_zero_budget_fails_before_scoring() {
        let curator = Curator::new(options(0), Box::new(IdentityOptimizer));
        let err = curator.run(&profile(), &job()).await.unwrap_err();
        assert!(matches!(err, ResumeCuratorError::InvalidBudget(0)));
    }

    #[tokio::test]
    async fn test_run_produces_document_within_budget() {
        let curator = Curator::new(options(45), Box::new(IdentityOptimizer));
        let report = curator.run(&profile(), &job()).await.unwrap();

        assert_eq!(report.status, SelectionStatus::Complete);
        assert!(report.total_cost <= 45);
        assert!(report.warnings.is_empty());
        assert_eq!(report.document.sections[0].title, "Experience");
    }

    #[tokio::test]
    async fn test_failing_optimizer_falls_back_softly() {
        let baseline = Curator::new(options(45), Box::new(IdentityOptimizer))
            .run(&profile(), &job())
            .await
            .unwrap();

        let curator = Curator::new(
            options(45),
            Box::new(MockOptimizer::failing("backend down")),
        );
        let report = curator.run(&profile(), &job()).await.unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("backend down"));
        assert_eq!(report.document, baseline.document);
    }

    #[tokio::test]
    async fn test_budget_too_small_reported_not_raised() {
        let curator = Curator::new(options(1), Box::new(IdentityOptimizer));
        let report = curator.run(&profile(), &job()).await.unwrap();

        assert_eq!(report.status, SelectionStatus::BudgetTooSmall);
        assert_eq!(report.selected_items, 0);
        assert_eq!(report.total_cost, 0);
    }
}
