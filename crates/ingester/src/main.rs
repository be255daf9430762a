mod batch;
mod input;
mod preview;

use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::Parser;
use database::Database;
use pipeline::{ContactSink, IngestOptions, Ingestor, TargetRegion};
use tracing::{info, warn};

use crate::batch::RunOutcome;
use crate::preview::PreviewSink;

const DEFAULT_DATABASE_URL: &str = "sqlite:data/contacts.db?mode=rwc";

#[derive(Debug, Parser)]
#[command(name = "ingester")]
#[command(about = "Normalize, classify and upsert contact CSV files")]
struct Args {
    /// CSV files (or directories of CSV files) to ingest
    files: Vec<PathBuf>,

    /// Directory whose CSV files should be ingested (repeatable)
    #[arg(long = "input-folder")]
    input_folders: Vec<PathBuf>,

    /// File extension matched inside directories
    #[arg(long, default_value = "csv")]
    extension: String,

    /// SQLite URL. Falls back to DATABASE_URL env.
    #[arg(long)]
    database_url: Option<String>,

    /// City flagged as the target
    #[arg(long, default_value = "Pune")]
    target_city: String,

    /// Region (state) whose other cities get their own category
    #[arg(long, default_value = "Maharashtra")]
    target_region: String,

    /// Abort a file after this many consecutive store connectivity failures
    #[arg(long, default_value_t = pipeline::ingest::DEFAULT_MAX_CONNECTIVITY_FAILURES)]
    max_connectivity_failures: usize,

    /// Normalize and classify without writing to the database
    #[arg(long)]
    dry_run: bool,

    /// Output path for dry-run JSON lines
    #[arg(long, default_value = "dry_run_normalized.jsonl")]
    preview_out: PathBuf,

    /// Output path for the failed-rows CSV (written only when rows fail)
    #[arg(long, default_value = "failed_rows.csv")]
    failed_rows: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let files = input::collect_files(&args.files, &args.input_folders, &args.extension);
    if files.is_empty() {
        return Err("No files to ingest (pass files or --input-folder)".into());
    }
    info!(count = files.len(), "Files to ingest");

    let options = IngestOptions {
        target: TargetRegion::new(&args.target_city, &args.target_region),
        max_consecutive_connectivity_failures: args.max_connectivity_failures,
    };

    let outcome = if args.dry_run {
        let ingestor = Ingestor::new(PreviewSink::create(&args.preview_out)?, options);
        let outcome = run(&ingestor, &files, &args).await?;
        ingestor.into_sink().finish()?;
        info!(out = %args.preview_out.display(), "Dry run: wrote normalized rows");
        outcome
    } else {
        let url = args
            .database_url
            .clone()
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        if let Some(parent) = sqlite_parent_dir(&url) {
            fs::create_dir_all(parent)?;
        }

        let db = Database::connect(&url).await?;
        db.migrate().await?;

        let ingestor = Ingestor::new(db, options);
        let outcome = run(&ingestor, &files, &args).await?;
        ingestor.sink().close().await;
        outcome
    };

    let summary = outcome.summary();
    println!("{}", serde_json::to_string(&summary)?);

    if outcome.aborted() {
        return Err("Ingest aborted: store unreachable".into());
    }
    if !summary.unreadable_files.is_empty() {
        return Err(format!("{} file(s) could not be read", summary.unreadable_files.len()).into());
    }

    Ok(())
}

/// Ingest every file, writing a combined failed-rows report.
async fn run<S: ContactSink>(
    ingestor: &Ingestor<S>,
    files: &[PathBuf],
    args: &Args,
) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let inputs = files
        .iter()
        .map(|path| (path.display().to_string(), fs::read(path)));
    let outcome = batch::ingest_inputs(ingestor, inputs).await;

    {
        let failed = outcome.failed_rows();
        if !failed.is_empty() {
            preview::write_failures(File::create(&args.failed_rows)?, &failed)?;
            warn!(
                count = failed.len(),
                path = %args.failed_rows.display(),
                "Wrote failed rows"
            );
        }
    }

    Ok(outcome)
}

/// Directory holding a file-backed SQLite database, if the URL names one.
fn sqlite_parent_dir(url: &str) -> Option<PathBuf> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
}
