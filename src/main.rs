//! Resume curator: job-targeted resume curation and page-fitting tool

mod cli;
mod config;
mod curate;
mod error;
mod job;
mod metrics;
mod optimize;
mod output;
mod profile;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::{Config, OutputFormat};
use curate::Curator;
use error::{Result, ResumeCuratorError};
use job::JobDescription;
use log::{error, info};
use optimize::{IdentityOptimizer, RemoteOptimizer, TextOptimizer};
use profile::ProfileStore;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Curate {
            job,
            candidate_data,
            page_limit,
            bullet_cap,
            format,
            output: save_path,
            no_llm,
        } => {
            cli::validate_file_extension(&job, &["json"])
                .map_err(|e| ResumeCuratorError::InvalidInput(format!("Job file: {}", e)))?;

            if let Some(page_limit) = page_limit {
                config.curation.page_limit = page_limit;
            }
            if let Some(bullet_cap) = bullet_cap {
                config.curation.bullet_cap = bullet_cap;
            }
            config.validate()?;

            let output_format = match format {
                Some(format) => {
                    cli::parse_output_format(&format).map_err(ResumeCuratorError::InvalidInput)?
                }
                None => config.output.format,
            };

            info!("Loading job description from {}", job.display());
            let job = JobDescription::from_json_file(&job)?;
            info!("Loaded job description: {}", job.title);

            info!("Loading candidate data from {}", candidate_data.display());
            let profile = ProfileStore::load(&candidate_data)?;
            info!("Loaded candidate data for: {}", profile.metadata.name);

            let optimizer: Box<dyn TextOptimizer> = if no_llm || !config.optimizer.enabled {
                info!("Text optimization disabled; running fully deterministic");
                Box::new(IdentityOptimizer)
            } else {
                Box::new(
                    RemoteOptimizer::with_timeout(
                        &config.optimizer.endpoint,
                        &config.optimizer.model,
                        Duration::from_secs(config.optimizer.timeout_secs),
                    )?
                    .with_cost_tolerance(config.optimizer.cost_tolerance),
                )
            };

            let curator = Curator::new(config.curation_options(), optimizer);
            let report = curator.run(&profile, &job).await?;

            match output_format {
                OutputFormat::Json => println!("{}", output::document_json(&report)?),
                OutputFormat::Console => output::print_summary(&report, config.output.color_output),
            }

            if let Some(path) = save_path {
                output::write_document(&report, &path)?;
                println!("Resume document saved to: {}", path.display());
            }

            Ok(())
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeCuratorError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("Configuration file: {}", Config::config_path().display());
                println!("{}", content);
                Ok(())
            }
            ConfigAction::Reset => {
                let config = Config::default();
                config.save()?;
                println!("Configuration reset to defaults");
                Ok(())
            }
        },
    }
}
