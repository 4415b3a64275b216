//! Quoteflow CLI - Normalize daily stock quote CSV drops
//!
//! # Main Commands
//!
//! ```bash
//! quoteflow serve                   # Start HTTP server (port 3000)
//! quoteflow transform daily.csv     # Transform a local CSV file
//! quoteflow event event.json        # Run one invocation from an event file
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! quoteflow sample-event            # Show an example trigger event
//! ```

use clap::{Parser, Subcommand};
use quoteflow::{handle_event, transform_csv, BucketEvent, FsStorage, StorageBackend};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quoteflow")]
#[command(about = "Normalize daily stock quote CSV drops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a local CSV file
    Transform {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one invocation from a trigger event JSON file
    Event {
        /// Event JSON file
        event: PathBuf,

        /// Serve buckets from this directory instead of the configured backend
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Show an example trigger event
    SampleEvent,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform { input, output } => cmd_transform(&input, output.as_deref()),

        Commands::Event { event, data_dir } => cmd_event(&event, data_dir).await,

        Commands::SampleEvent => cmd_sample_event(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_transform(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let content = fs::read_to_string(input)?;
    let transformed = transform_csv(&content)?;

    eprintln!("   Columns: {}", transformed.columns.join(", "));
    eprintln!("✅ Transformed {} rows", transformed.row_count);

    write_output(&transformed.csv, output)?;

    Ok(())
}

async fn cmd_event(
    event_path: &Path,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📨 Event: {}", event_path.display());

    let content = fs::read_to_string(event_path)?;
    let event = BucketEvent::from_json(&content)?;

    let storage = match data_dir {
        Some(dir) => StorageBackend::Fs(FsStorage::new(dir)),
        None => StorageBackend::from_env(),
    };
    eprintln!("   Storage: {}", storage.describe());

    let response = handle_event(&event, &storage).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_sample_event() -> Result<(), Box<dyn std::error::Error>> {
    let sample = BucketEvent::sample();
    println!("{}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    quoteflow::server::start_server(port, StorageBackend::from_env()).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
