//! Budget-constrained content selection
//!
//! Selection is a 0/1 knapsack over bullets grouped by their parent entry:
//! a bullet can only be taken if its entry header is taken, the header costs
//! space of its own, and an entry with no selected bullets is dropped
//! entirely. We solve it greedily by score density with a per-entry bullet
//! cap; costs are line-count estimates, so the approximation is deliberate
//! and exact DP optimality is not a goal.

use crate::curate::scorer::{GroupId, ItemContent, ScoredItem};
use crate::error::{Result, ResumeCuratorError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Most bullets one entry may keep; breadth over depth.
    pub bullet_cap: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { bullet_cap: 4 }
    }
}

/// Outcome tag of a selection run. `BudgetTooSmall` means there was content
/// but no non-empty subset fit; callers present that distinctly from a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStatus {
    Complete,
    BudgetTooSmall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Chosen items in profile order, headers before their bullets.
    pub items: Vec<ScoredItem>,
    pub total_cost: u64,
    pub total_score: f64,
    pub status: SelectionStatus,
    pub budget: i64,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct ContentSelector {
    config: SelectorConfig,
}

struct Candidate<'a> {
    item: &'a ScoredItem,
    density: f64,
}

impl ContentSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn select(&self, items: &[ScoredItem], budget: i64) -> Result<SelectionResult> {
        if budget <= 0 {
            return Err(ResumeCuratorError::InvalidBudget(budget));
        }
        let budget_cost = budget as u64;

        // Headers are charged when their group first contributes a bullet;
        // bullets and standalone entries compete on density.
        let mut headers: HashMap<GroupId, &ScoredItem> = HashMap::new();
        let mut members: Vec<Candidate> = Vec::new();
        for item in items {
            match item.content {
                ItemContent::Header { .. } => {
                    headers.insert(item.id.group(), item);
                }
                ItemContent::Bullet { .. } | ItemContent::Entry { .. } => {
                    members.push(Candidate {
                        item,
                        density: item.score / item.cost.max(1) as f64,
                    });
                }
            }
        }

        // Stable sort: equal densities keep profile order.
        members.sort_by(|a, b| b.density.total_cmp(&a.density));

        let mut total_cost: u64 = 0;
        let mut total_score: f64 = 0.0;
        let mut open_groups: HashMap<GroupId, usize> = HashMap::new();
        let mut chosen: Vec<&ScoredItem> = Vec::new();

        for candidate in &members {
            let item = candidate.item;
            let group = item.id.group();
            let is_bullet = matches!(item.content, ItemContent::Bullet { .. });

            if is_bullet {
                if let Some(selected) = open_groups.get(&group) {
                    if *selected >= self.config.bullet_cap {
                        continue;
                    }
                }
            }

            let header = if is_bullet && !open_groups.contains_key(&group) {
                headers.get(&group).copied()
            } else {
                None
            };
            let incremental =
                item.cost as u64 + header.map(|h| h.cost as u64).unwrap_or(0);

            if total_cost + incremental > budget_cost {
                continue;
            }

            total_cost += incremental;
            total_score += item.score;
            if let Some(header) = header {
                total_score += header.score;
                chosen.push(header);
            }
            if is_bullet {
                *open_groups.entry(group).or_insert(0) += 1;
            }
            chosen.push(item);
        }

        debug_assert!(total_cost <= budget_cost);

        let status = if chosen.is_empty() && !members.is_empty() {
            SelectionStatus::BudgetTooSmall
        } else {
            SelectionStatus::Complete
        };

        let mut selected: Vec<ScoredItem> = chosen.into_iter().cloned().collect();
        selected.sort_by_key(|item| item.id.sort_key());

        Ok(SelectionResult {
            items: selected,
            total_cost,
            total_score,
            status,
            budget,
        })
    }
}

impl Default for ContentSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}
