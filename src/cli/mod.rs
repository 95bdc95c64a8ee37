// CLI module for tagscope
//
// Command-line front end over the library. Only compiled into the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use config::Config;

use thiserror::Error;

// Error type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Tag(#[from] tagscope::TagError),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("{0}")]
    Other(String),
}
