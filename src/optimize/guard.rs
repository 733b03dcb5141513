//! Faithfulness and budget guards for rewritten text
//!
//! A rewrite may rephrase, never invent: every factual token of the source
//! (numbers and proper nouns / technology names) must survive, and the
//! rewritten space cost must not exceed the original beyond the configured
//! tolerance. Rewrites failing either check are dropped item by item, so an
//! optimizer can never break the feasibility established by selection.

use crate::curate::scorer::{ItemContent, ItemId};
use crate::curate::selector::SelectionResult;
use crate::metrics;
use std::collections::{BTreeSet, HashMap};
use unicode_segmentation::UnicodeSegmentation;

/// Tokens that must survive a rewrite, lowercased: anything carrying a digit
/// (metrics, versions, dates) and capitalized words that do not merely open
/// a sentence (names, products, technologies).
pub fn fact_tokens(text: &str) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();

    for sentence in text.unicode_sentences() {
        for (position, word) in sentence.split_whitespace().enumerate() {
            let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '%');
            if cleaned.is_empty() {
                continue;
            }

            let has_digit = cleaned.chars().any(|c| c.is_ascii_digit());
            let capitalized = cleaned.chars().next().is_some_and(|c| c.is_uppercase());

            if has_digit || (capitalized && position > 0) {
                tokens.insert(cleaned.to_lowercase());
            }
        }
    }

    tokens
}

/// True when every fact token of `original` appears in `rewritten`
/// (case-insensitive).
pub fn preserves_facts(original: &str, rewritten: &str) -> bool {
    let rewritten = rewritten.to_lowercase();
    fact_tokens(original)
        .iter()
        .all(|token| rewritten.contains(token))
}

/// Apply candidate rewrites to a selection, keeping the original text for
/// any rewrite that drops facts or exceeds the cost tolerance. Returns the
/// updated selection and a description of each rejected rewrite.
pub fn apply_rewrites(
    selection: &SelectionResult,
    rewrites: &HashMap<ItemId, String>,
    cost_tolerance: u32,
) -> (SelectionResult, Vec<String>) {
    let mut result = selection.clone();
    let mut rejected = Vec::new();

    for item in &mut result.items {
        let Some(candidate) = rewrites.get(&item.id) else {
            continue;
        };
        let candidate = candidate.trim();
        if candidate.is_empty() {
            rejected.push(format!("{:?}: empty rewrite", item.id));
            continue;
        }

        match &mut item.content {
            ItemContent::Bullet { text } => {
                if !preserves_facts(text, candidate) {
                    rejected.push(format!("{:?}: rewrite drops factual content", item.id));
                    continue;
                }
                let new_cost = metrics::text_lines(candidate);
                if new_cost > item.cost + cost_tolerance {
                    rejected.push(format!(
                        "{:?}: rewrite costs {} lines (was {})",
                        item.id, new_cost, item.cost
                    ));
                    continue;
                }
                *text = candidate.to_string();
                item.cost = new_cost;
            }
            ItemContent::Header { detail: Some(detail), .. }
            | ItemContent::Entry { detail: Some(detail), .. } => {
                if !preserves_facts(detail, candidate) {
                    rejected.push(format!("{:?}: rewrite drops factual content", item.id));
                    continue;
                }
                let old_lines = metrics::text_lines(detail);
                let new_lines = metrics::text_lines(candidate);
                let new_cost = item.cost - old_lines.min(item.cost) + new_lines;
                if new_cost > item.cost + cost_tolerance {
                    rejected.push(format!(
                        "{:?}: rewrite costs {} lines (was {})",
                        item.id, new_cost, item.cost
                    ));
                    continue;
                }
                *detail = candidate.to_string();
                item.cost = new_cost;
            }
            _ => {
                rejected.push(format!("{:?}: not a rewritable item", item.id));
            }
        }
    }

    result.total_cost = result.items.iter().map(|i| i.cost as u64).sum();
    (result, rejected)
}
