//! CLI interface for the resume curator

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-curator")]
#[command(about = "Job-targeted resume curation and page-fitting tool")]
#[command(
    long_about = "Select and fit the most relevant parts of a candidate profile against a job description, within a fixed page budget"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Curate a resume for a job description
    Curate {
        /// Path to the parsed job description (JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Path to the candidate data directory
        #[arg(short = 'd', long)]
        candidate_data: PathBuf,

        /// Page budget (overrides configuration)
        #[arg(short, long)]
        page_limit: Option<i64>,

        /// Max bullets per entry (overrides configuration)
        #[arg(long)]
        bullet_cap: Option<usize>,

        /// Output format: console, json
        #[arg(short, long)]
        format: Option<String>,

        /// Save the resume document to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip LLM text optimization (fully deterministic run)
        #[arg(long)]
        no_llm: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert!(parse_output_format("json").is_ok());
        assert!(parse_output_format("Console").is_ok());
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(&PathBuf::from("job.json"), &["json"]).is_ok());
        assert!(validate_file_extension(&PathBuf::from("job.yaml"), &["json"]).is_err());
        assert!(validate_file_extension(&PathBuf::from("job"), &["json"]).is_err());
    }
}
