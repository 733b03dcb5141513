//! Resume curator library

pub mod cli;
pub mod config;
pub mod curate;
pub mod error;
pub mod job;
pub mod metrics;
pub mod optimize;
pub mod output;
pub mod profile;

pub use config::Config;
pub use error::{Result, ResumeCuratorError};
