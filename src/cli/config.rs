// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tagscope::ReadOptions;

use super::CliResult;

/// tagscope - Audio tag reader
#[derive(Parser, Debug)]
#[command(name = "tagscope")]
#[command(
    about = "Reads title, artist, album, year and track number from MP3 and M4A files",
    long_about = None
)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only accept an ID3 marker starting before this byte offset
    #[arg(long, global = true)]
    pub max_search_offset: Option<usize>,

    /// Maximum MP4 atom nesting depth
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// JSON file with reader options
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read tags from audio file(s)
    Read {
        /// Audio file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<String>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Detect file format
    Detect {
        /// Audio file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<String>,
    },

    /// Read every file matching a pattern under a directory
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: String,

        /// File pattern (e.g., "*.mp3", "*.m4a")
        #[arg(short, long)]
        pattern: String,
    },

    /// Show file information
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<String>,
    },
}

impl Config {
    /// Reader options: the options file first, then flag overrides
    pub fn read_options(&self) -> CliResult<ReadOptions> {
        let mut options = match &self.options {
            Some(path) => ReadOptions::from_json(&std::fs::read_to_string(path)?)?,
            None => ReadOptions::default(),
        };
        if let Some(offset) = self.max_search_offset {
            options = options.with_max_search_offset(offset);
        }
        if let Some(depth) = self.max_depth {
            options = options.with_max_atom_depth(depth);
        }
        Ok(options)
    }
}
