// CLI binary entry point for tagscope

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Config;

fn init_logging(config: &Config) {
    let default_level = if config.quiet {
        "error"
    } else if config.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config);

    cli::commands::run(&config)?;
    Ok(())
}
