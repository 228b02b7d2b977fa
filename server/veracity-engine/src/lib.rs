//! Comment Veracity Engine — deterministic, rule-based authenticity scoring.
//!
//! Normalizes platform API fragments and CSV rows into comment records, runs a
//! fixed, ordered heuristic rule set over each one, aggregates the findings into
//! verdicts and a label tally, and shapes the result for a PDF/chart renderer.
//!
//! No ML, no DB, no network; pure computation over an already-collected batch.

pub mod config;
pub mod csv_input;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod report;
pub mod rules;
pub mod samples;
pub mod types;

pub use config::{Config, ReportConfig, RuleConfig, Thresholds};
pub use csv_input::read_rows;
pub use engine::{score, score_batch, Engine};
pub use error::EngineError;
pub use normalize::normalize;
pub use report::build_report_data;
pub use rules::{Rule, RuleSet};
pub use types::{
  BatchReport, CommentRecord, CsvRow, InboundComment, Label, Platform, RawRecord, ReportPayload,
  RuleFinding, Verdict,
};
