//! Binary entrypoint: read raw comment JSON lines from stdin, write one JSON object to stdout.
//!
//! Each input line is an API-shaped comment record; `--csv` reads a comment CSV file
//! instead. Records that fail to parse or normalize are logged to stderr and skipped;
//! the rest are scored as one batch.
//! Output is the renderer payload, or the full batch report with `--batch`.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use veracity_engine::samples::demo_comments;
use veracity_engine::{
  normalize, read_rows, CommentRecord, Config, CsvRow, Engine, EngineError, InboundComment, Platform,
  RawRecord,
};

#[derive(Parser)]
#[command(name = "veracity-engine")]
#[command(about = "Score social-media comments for authenticity")]
#[command(version)]
struct Cli {
  /// JSON config file (partial files keep defaults for missing keys)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Platform of the input records (youtube, facebook, instagram, x, linkedin, csv)
  #[arg(short, long)]
  platform: Option<String>,

  /// Post URL the comments came from; used to infer the platform
  #[arg(short, long)]
  source: Option<String>,

  /// Score the built-in sample comments instead of reading stdin
  #[arg(long)]
  demo: bool,

  /// Read comments from a CSV file (header row, or author,text,publishedAt,likeCount,platform)
  #[arg(long, value_name = "PATH", conflicts_with = "demo")]
  csv: Option<PathBuf>,

  /// Emit the full batch report (verdicts + findings) instead of the render payload
  #[arg(long)]
  batch: bool,

  /// Verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
  let subscriber = FmtSubscriber::builder()
    .with_max_level(log_level)
    .with_target(false)
    .with_writer(io::stderr)
    .finish();
  if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
    let _ = writeln!(io::stderr(), "veracity-engine: logging disabled: {}", e);
  }

  if let Err(e) = run_binary(&cli) {
    let _ = writeln!(io::stderr(), "veracity-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
  let config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::default(),
  };
  let engine = Engine::new(config)?;

  let hint = resolve_hint(cli)?;
  let comments = if cli.demo {
    let platform = hint.unwrap_or(Platform::YouTube);
    info!(%platform, "scoring demo comments");
    collect(demo_comments(platform).into_iter().map(Ok), hint)
  } else if let Some(path) = &cli.csv {
    info!(path = %path.display(), "reading csv input");
    collect_csv(read_rows(File::open(path)?)?, hint)
  } else {
    let stdin = io::stdin();
    let lines = stdin
      .lock()
      .lines()
      .collect::<Result<Vec<_>, _>>()?
      .into_iter()
      .filter(|l| !l.trim().is_empty())
      .map(|l| serde_json::from_str::<InboundComment>(l.trim()));
    collect(lines, hint)
  };

  if comments.is_empty() {
    warn!("no comments collected; emitting an empty report");
  } else {
    info!(count = comments.len(), "analyzing comments");
  }

  let batch = engine.score_batch(&comments);
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  if cli.batch {
    serde_json::to_writer(&mut out, &batch)?;
  } else {
    serde_json::to_writer(&mut out, &engine.build_report(&batch))?;
  }
  writeln!(out)?;
  out.flush()?;
  Ok(())
}

fn resolve_hint(cli: &Cli) -> Result<Option<Platform>, String> {
  if let Some(name) = &cli.platform {
    return Platform::from_str_loose(name)
      .map(Some)
      .ok_or_else(|| format!("unknown platform: {}", name));
  }
  if let Some(url) = &cli.source {
    let detected = Platform::from_url(url);
    if detected.is_none() {
      warn!(source = %url, "could not detect platform from source URL");
    }
    return Ok(detected);
  }
  Ok(None)
}

/// Normalize every record, skipping (and logging) the ones that cannot be used.
fn collect<I>(records: I, hint: Option<Platform>) -> Vec<CommentRecord>
where
  I: Iterator<Item = Result<InboundComment, serde_json::Error>>,
{
  let mut comments = Vec::new();
  for (i, record) in records.enumerate() {
    let record_no = i + 1;
    let raw = match record {
      Ok(r) => r,
      Err(e) => {
        warn!(record = record_no, error = %e, "skipping unparseable record");
        continue;
      }
    };
    let platform = hint.or_else(|| raw.platform.as_deref().and_then(Platform::from_str_loose));
    let Some(platform) = platform else {
      warn!(record = record_no, "skipping record with no known platform; pass --platform or --source");
      continue;
    };
    match normalize(&RawRecord::Api(raw), platform) {
      Ok(c) => comments.push(c),
      Err(e) => warn!(record = record_no, error = %e, "skipping malformed record"),
    }
  }
  comments
}

/// CSV rows take the hint, then their own `platform` column, then `Platform::Csv`.
fn collect_csv<I>(rows: I, hint: Option<Platform>) -> Vec<CommentRecord>
where
  I: IntoIterator<Item = Result<CsvRow, EngineError>>,
{
  let mut comments = Vec::new();
  for (i, row) in rows.into_iter().enumerate() {
    let record_no = i + 1;
    let row = match row {
      Ok(r) => r,
      Err(e) => {
        warn!(record = record_no, error = %e, "skipping unreadable csv row");
        continue;
      }
    };
    let platform = hint
      .or_else(|| row.first_of(&["platform"]).and_then(Platform::from_str_loose))
      .unwrap_or(Platform::Csv);
    match normalize(&RawRecord::Csv(row), platform) {
      Ok(c) => comments.push(c),
      Err(e) => warn!(record = record_no, error = %e, "skipping malformed csv row"),
    }
  }
  comments
}
