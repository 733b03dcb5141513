//! Output boundary: intermediate-model JSON and the console summary
//!
//! The JSON document is the hand-off to an external renderer; it already
//! contains only selected, finalized text, so renderers must not trim
//! further.

use crate::curate::{CurationReport, SelectionStatus};
use crate::error::Result;
use colored::Colorize;
use std::path::Path;

/// Serialize the resume document as pretty JSON.
pub fn document_json(report: &CurationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.document)?)
}

/// Write the resume document to a file.
pub fn write_document(report: &CurationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, document_json(report)?)?;
    Ok(())
}

/// Human-readable run summary on stdout.
pub fn print_summary(report: &CurationReport, color: bool) {
    if !color {
        colored::control::set_override(false);
    }

    println!("\n{}", "Resume Summary".bold());
    println!("  Candidate: {}", report.document.header.name);
    for section in &report.document.sections {
        println!("  {}: {} entr(ies)", section.title, section.entries.len());
    }
    println!(
        "  Space: {} / {} lines",
        report.total_cost, report.budget
    );
    println!("  Relevance: {:.2}", report.total_score);
    println!("  Optimizer: {}", report.optimizer);

    match report.status {
        SelectionStatus::Complete => {
            println!("  {}", "Fits the page budget".green());
        }
        SelectionStatus::BudgetTooSmall => {
            println!(
                "  {}",
                "Nothing fits the page budget; the document is empty".yellow()
            );
        }
    }

    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}
