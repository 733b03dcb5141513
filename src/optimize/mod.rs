//! Text optimization capability
//!
//! The pipeline treats wording improvement as an injected capability: a
//! `TextOptimizer` may rephrase selected text toward the job's vocabulary,
//! but it may not invent facts and it may not grow the selection past the
//! budget. `IdentityOptimizer` is the deterministic no-op used when
//! optimization is disabled; `MockOptimizer` makes the pipeline testable
//! without a live backend; `RemoteOptimizer` talks to an HTTP endpoint.

pub mod guard;
pub mod prompts;
pub mod remote;

use crate::curate::scorer::{ItemContent, ItemId};
use crate::curate::selector::SelectionResult;
use crate::error::{Result, ResumeCuratorError};
use crate::job::JobDescription;
use async_trait::async_trait;
use std::collections::HashMap;

pub use remote::RemoteOptimizer;

#[async_trait]
pub trait TextOptimizer: Send + Sync {
    fn name(&self) -> &str;

    /// Return the selection with text fields rewritten. Implementations must
    /// go through [`guard::apply_rewrites`] so every accepted rewrite keeps
    /// the source facts and the budget feasibility of the input selection.
    async fn optimize(
        &self,
        selection: &SelectionResult,
        job: &JobDescription,
    ) -> Result<SelectionResult>;
}

/// The texts an optimizer is allowed to touch: bullet statements and entry
/// detail prose (project descriptions), in selection order.
pub fn rewritable_texts(selection: &SelectionResult) -> Vec<(ItemId, String)> {
    selection
        .items
        .iter()
        .filter_map(|item| match &item.content {
            ItemContent::Bullet { text } => Some((item.id, text.clone())),
            ItemContent::Header { detail: Some(detail), .. }
            | ItemContent::Entry { detail: Some(detail), .. } => {
                Some((item.id, detail.clone()))
            }
            _ => None,
        })
        .collect()
}

/// No-op optimizer: the `--no-llm` path. Byte-for-byte deterministic.
pub struct IdentityOptimizer;

#[async_trait]
impl TextOptimizer for IdentityOptimizer {
    fn name(&self) -> &str {
        "identity"
    }

    async fn optimize(
        &self,
        selection: &SelectionResult,
        _job: &JobDescription,
    ) -> Result<SelectionResult> {
        Ok(selection.clone())
    }
}

/// Deterministic test double: serves pre-configured rewrites keyed by the
/// rewritable-text index, or fails on demand.
pub struct MockOptimizer {
    rewrites: HashMap<usize, String>,
    cost_tolerance: u32,
    fail_with: Option<String>,
}

impl MockOptimizer {
    pub fn new() -> Self {
        Self {
            rewrites: HashMap::new(),
            cost_tolerance: 0,
            fail_with: None,
        }
    }

    pub fn with_rewrite(mut self, index: usize, text: impl Into<String>) -> Self {
        self.rewrites.insert(index, text.into());
        self
    }

    pub fn with_cost_tolerance(mut self, tolerance: u32) -> Self {
        self.cost_tolerance = tolerance;
        self
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            rewrites: HashMap::new(),
            cost_tolerance: 0,
            fail_with: Some(reason.into()),
        }
    }
}

impl Default for MockOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextOptimizer for MockOptimizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn optimize(
        &self,
        selection: &SelectionResult,
        _job: &JobDescription,
    ) -> Result<SelectionResult> {
        if let Some(reason) = &self.fail_with {
            return Err(ResumeCuratorError::OptimizationUnavailable(reason.clone()));
        }

        let targets = rewritable_texts(selection);
        let mut by_id: HashMap<ItemId, String> = HashMap::new();
        for (index, text) in &self.rewrites {
            if let Some((id, _)) = targets.get(*index) {
                by_id.insert(*id, text.clone());
            }
        }

        let (optimized, _rejected) =
            guard::apply_rewrites(selection, &by_id, self.cost_tolerance);
        Ok(optimized)
    }
}
