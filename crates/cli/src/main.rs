//! CLI entry point for ts2mp4
//!
//! Parses command line arguments, builds the conversion job, and prints
//! every event the supervisor emits.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ts2mp4_supervisor::{
    check_encoder_available, find_source_files, BatchSequencer, Config, ConversionJob,
};

/// ts2mp4 - Batch-convert transport-stream files to MP4
#[derive(Parser, Debug)]
#[command(name = "ts2mp4")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input .ts files; directories are scanned for .ts files recursively
    inputs: Vec<PathBuf>,

    /// Directory for converted files (outputs land beside their inputs if omitted)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the encoder availability check. For testing only.
    #[arg(long, default_value = "false")]
    skip_checks: bool,

    /// Print events as JSON lines instead of plain text
    #[arg(long, default_value = "false")]
    json: bool,
}

/// Expand directory arguments into their eligible source files.
fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut collected = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collected.extend(find_source_files(input));
        } else {
            collected.push(input.clone());
        }
    }
    collected
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if !args.skip_checks {
        if let Err(e) = check_encoder_available(&config.encoder.binary) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    // the command-line flag wins over the configured default
    let output_dir = args.output_dir.clone().or(config.batch.output_dir.clone());
    let job = ConversionJob::new(collect_inputs(&args.inputs), output_dir);

    let sequencer = BatchSequencer::new(&config);
    let (mut events, handle) = sequencer.spawn(job);

    while let Some(event) = events.recv().await {
        if args.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("Failed to serialize event: {}", e),
            }
        } else {
            println!("{}", event);
        }
    }

    match handle.await {
        Ok(summary) => {
            if summary.failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Batch worker panicked: {}", e);
            ExitCode::FAILURE
        }
    }
}
