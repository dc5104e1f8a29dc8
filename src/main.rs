//! retitle - translate the embedded subtitles of a video file
//!
//! Extracts the subtitle stream with ffmpeg, translates it in batches
//! and muxes the result into a new video file.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retitle::cli::Args;
use retitle::config::Config;
use retitle::workflow::Workflow;

const CONFIG_FILE: &str = "retitle.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging()?;

    info!("Starting retitle");

    let config = if Path::new(CONFIG_FILE).exists() {
        info!("Found {} in current directory, loading...", CONFIG_FILE);
        Config::from_file(CONFIG_FILE)?
    } else {
        Config::default()
    };

    let workflow = Workflow::new(config)?;
    workflow
        .run(&args.input, &args.output, |checkpoint| println!("{}", checkpoint))
        .await?;

    info!("Done");
    Ok(())
}

fn setup_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".retitle").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "retitle.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
