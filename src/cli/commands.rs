// CLI command implementations
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::json;
use tagscope::{AudioFile, ReadOptions, Tag};
use tracing::debug;

use crate::cli::config::{Commands, Config};
use crate::cli::output::{OutputFormatter, ProgressBar};
use crate::cli::{CliError, CliResult};

/// Run the selected subcommand
pub fn run(config: &Config) -> CliResult<()> {
    let options = config.read_options()?;
    debug!(?options, "Reader options");
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match &config.command {
        Commands::Read { files, output } => {
            command_read(files, output.as_deref(), &options, &formatter)
        }
        Commands::Detect { files } => command_detect(files, &options, &formatter),
        Commands::Batch { directory, pattern } => {
            command_batch(directory, pattern, &options, &formatter)
        }
        Commands::Info { files } => command_info(files, &options, &formatter),
    }
}

/// JSON record printed for one file
fn tag_record(path: &str, audio: &AudioFile, tag: Option<&Tag>) -> serde_json::Value {
    json!({
        "file": path,
        "format": audio.file_type.to_string(),
        "tag": tag,
    })
}

fn open(path: &str, options: &ReadOptions) -> CliResult<AudioFile> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    Ok(AudioFile::with_options(path, options.clone())?)
}

fn failures(failed: usize, total: usize) -> CliResult<()> {
    if failed > 0 {
        return Err(CliError::Other(format!("{} of {} files failed", failed, total)));
    }
    Ok(())
}

/// Read tags from files
fn command_read(
    files: &[String],
    output: Option<&str>,
    options: &ReadOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::Other("No files specified".to_string()));
    }

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    let mut failed = 0;
    for file_path in files {
        let result = open(file_path, options).and_then(|audio| {
            let tag = audio.read_tag()?;
            Ok(tag_record(file_path, &audio, tag.as_ref()))
        });
        match result {
            Ok(record) => formatter.output_record(&record, &mut *writer)?,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                failed += 1;
            }
        }
    }
    writer.flush()?;

    failures(failed, files.len())
}

/// Detect file format
fn command_detect(
    files: &[String],
    options: &ReadOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::Other("No files specified".to_string()));
    }

    let mut failed = 0;
    for file_path in files {
        match open(file_path, options) {
            Ok(audio) => println!("{}: {}", file_path, audio.file_type),
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                failed += 1;
            }
        }
    }

    failures(failed, files.len())
}

/// Read every file under a directory that matches a pattern
fn command_batch(
    directory: &str,
    pattern: &str,
    options: &ReadOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    use glob::glob;

    // Build glob pattern
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory, pattern)
    } else {
        format!("{}/**/{}", directory, pattern)
    };

    // Find matching files
    let mut files: Vec<String> = Vec::new();
    for entry in glob(&glob_pattern)? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(path_str) = path.to_str() {
                        files.push(path_str.to_string());
                    }
                }
            }
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    let total = files.len();
    if total == 0 {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("Processing {} files...", total));

    let mut progress = ProgressBar::new(total, !formatter.quiet);
    let mut tagged = 0;
    let mut untagged = 0;
    let mut errors = 0;
    for file_path in &files {
        match open(file_path, options).and_then(|audio| Ok(audio.read_tag()?)) {
            Ok(Some(_)) => tagged += 1,
            Ok(None) => untagged += 1,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                errors += 1;
            }
        }
        progress.increment(file_path);
    }

    formatter.print_info(&format!(
        "Completed: {} tagged, {} without tag, {} errors",
        tagged, untagged, errors
    ));
    failures(errors, total)
}

/// Show detailed file information
fn command_info(
    files: &[String],
    options: &ReadOptions,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    let mut failed = 0;
    for file_path in files {
        let audio = match open(file_path, options) {
            Ok(audio) => audio,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                failed += 1;
                continue;
            }
        };

        let metadata = std::fs::metadata(&audio.path)?;
        let modified = metadata.modified().ok().map(|mtime| {
            chrono::DateTime::<chrono::Utc>::from(mtime)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        });

        println!("\n📁 {}", file_path);
        println!("{}", "─".repeat(60));
        println!("Size: {} bytes", metadata.len());
        if let Some(modified) = modified {
            println!("Modified: {}", modified);
        }
        println!("Format: {}", audio.file_type);

        match audio.read_tag() {
            Ok(Some(tag)) => {
                println!("Title: {}", tag.title());
                println!("Artist: {}", tag.artist());
                println!("Album: {}", tag.album());
                if let Some(year) = tag.year {
                    println!("Year: {}", year);
                }
                if let Some(track) = tag.track_number {
                    println!("Track: {}", track);
                }
            }
            Ok(None) => println!("Tag: none"),
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
                failed += 1;
            }
        }
    }

    failures(failed, files.len())
}
