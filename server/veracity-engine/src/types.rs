//! Core types for the veracity engine (raw record contracts + internal models + report payload).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ---------------------------------------------------------------------------
// Inbound types (what the fetch / CSV layers hand us)
// ---------------------------------------------------------------------------

/// One comment fragment from a platform API. Unknown fields are silently ignored.
///
/// Field aliases cover the YouTube Data API (`authorDisplayName`, `totalReplyCount`) and
/// the Graph API (`from.name`, `created_time`). Text keys that can appear side by side in
/// one payload are separate fields; see `InboundComment::body`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundComment {
  #[serde(default, alias = "commentId", alias = "comment_id")]
  pub id: Option<String>,
  #[serde(default, alias = "authorDisplayName", alias = "username", alias = "authorHandle")]
  pub author: Option<String>,
  #[serde(default)]
  pub from: Option<InboundAuthor>,
  #[serde(default)]
  pub text: Option<String>,
  /// YouTube snippets carry both the rendered and the original text.
  #[serde(default, rename = "textOriginal")]
  pub text_original: Option<String>,
  #[serde(default, rename = "textDisplay")]
  pub text_display: Option<String>,
  /// Graph API body field.
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default, alias = "publishedAt", alias = "created_time", alias = "timestamp")]
  pub published_at: Option<String>,
  #[serde(default, alias = "likeCount", alias = "likes")]
  pub like_count: Option<u64>,
  #[serde(default, alias = "replyCount", alias = "totalReplyCount", alias = "comment_count")]
  pub reply_count: Option<u64>,
  /// Platform name carried by the record itself, used when the caller has no hint.
  #[serde(default)]
  pub platform: Option<String>,
}

impl InboundComment {
  /// Comment body: original text first, then rendered text, then generic/Graph API keys.
  pub fn body(&self) -> Option<&str> {
    self
      .text_original
      .as_deref()
      .or(self.text_display.as_deref())
      .or(self.text.as_deref())
      .or(self.message.as_deref())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundAuthor {
  #[serde(default)]
  pub name: Option<String>,
}

/// One CSV row keyed by header name.
#[derive(Debug, Clone, Default)]
pub struct CsvRow {
  /// 1-based data row number, when the reader tracks it.
  pub row_number: Option<usize>,
  pub fields: HashMap<String, String>,
}

impl CsvRow {
  pub fn new(row_number: Option<usize>, fields: HashMap<String, String>) -> Self {
    Self { row_number, fields }
  }

  /// First non-empty value among the given column names.
  pub fn first_of(&self, columns: &[&str]) -> Option<&str> {
    columns
      .iter()
      .filter_map(|c| self.fields.get(*c))
      .map(|v| v.trim())
      .find(|v| !v.is_empty())
  }

  /// First column present among the given names, even if its value is empty.
  pub fn present_of(&self, columns: &[&str]) -> Option<&str> {
    columns
      .iter()
      .find_map(|c| self.fields.get(*c))
      .map(|v| v.trim())
  }
}

/// A raw record before normalization.
#[derive(Debug, Clone)]
pub enum RawRecord {
  Api(InboundComment),
  Csv(CsvRow),
}

// ---------------------------------------------------------------------------
// Platform enum (normalized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  YouTube,
  Facebook,
  Instagram,
  X,
  LinkedIn,
  Csv,
}

impl Platform {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "youtube" | "yt" => Some(Self::YouTube),
      "facebook" | "fb" => Some(Self::Facebook),
      "instagram" | "ig" | "insta" => Some(Self::Instagram),
      "x" | "twitter" => Some(Self::X),
      "linkedin" | "li" => Some(Self::LinkedIn),
      "csv" => Some(Self::Csv),
      _ => None,
    }
  }

  /// Detect the platform a post URL belongs to.
  pub fn from_url(url: &str) -> Option<Self> {
    let u = url.to_ascii_lowercase();
    let host = u
      .split("://")
      .nth(1)
      .unwrap_or(u.as_str())
      .split(['/', '?', '#'])
      .next()
      .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let is = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));

    if is("youtube.com") || is("youtu.be") {
      Some(Self::YouTube)
    } else if is("instagram.com") {
      Some(Self::Instagram)
    } else if is("facebook.com") || is("fb.com") {
      Some(Self::Facebook)
    } else if is("x.com") || is("twitter.com") {
      Some(Self::X)
    } else if is("linkedin.com") {
      Some(Self::LinkedIn)
    } else {
      None
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::YouTube => "youtube",
      Self::Facebook => "facebook",
      Self::Instagram => "instagram",
      Self::X => "x",
      Self::LinkedIn => "linkedin",
      Self::Csv => "csv",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Canonical comment after normalization. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
  pub id: String,
  pub author_handle: String,
  pub text: String,
  pub timestamp: Option<DateTime<Utc>>,
  pub like_count: Option<u64>,
  pub reply_count: Option<u64>,
  pub source_platform: Platform,
}

/// One rule's contribution to a comment's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFinding {
  pub rule_name: String,
  pub score_delta: f64,
  pub reason: String,
}

impl RuleFinding {
  pub fn new(rule_name: &str, score_delta: f64, reason: impl Into<String>) -> Self {
    Self {
      rule_name: rule_name.to_string(),
      score_delta,
      reason: reason.into(),
    }
  }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
  Authentic,
  Suspicious,
  Inauthentic,
}

impl Label {
  /// Display order used for tallies and pie slices.
  pub const ALL: [Label; 3] = [Label::Authentic, Label::Suspicious, Label::Inauthentic];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Authentic => "authentic",
      Self::Suspicious => "suspicious",
      Self::Inauthentic => "inauthentic",
    }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Final classification of one comment. Holds its own copy of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
  pub comment: CommentRecord,
  pub total_score: f64,
  pub label: Label,
  /// Findings in rule evaluation order.
  pub findings: Vec<RuleFinding>,
}

/// Verdicts for a batch plus their label tally.
///
/// Counts are derived from the verdicts at construction; there is no way to
/// mutate either side independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
  verdicts: Vec<Verdict>,
  counts: BTreeMap<Label, usize>,
}

impl BatchReport {
  pub fn new(verdicts: Vec<Verdict>) -> Self {
    let mut counts: BTreeMap<Label, usize> = Label::ALL.iter().map(|l| (*l, 0)).collect();
    for v in &verdicts {
      *counts.entry(v.label).or_insert(0) += 1;
    }
    Self { verdicts, counts }
  }

  pub fn verdicts(&self) -> &[Verdict] {
    &self.verdicts
  }

  /// Tally over every label, zero counts included.
  pub fn counts(&self) -> &BTreeMap<Label, usize> {
    &self.counts
  }

  pub fn count(&self, label: Label) -> usize {
    self.counts.get(&label).copied().unwrap_or(0)
  }

  pub fn len(&self) -> usize {
    self.verdicts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.verdicts.is_empty()
  }
}

// ---------------------------------------------------------------------------
// Output types (what the renderer consumes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
  pub label: Label,
  pub count: usize,
  /// Share of all verdicts, 0..=100, one decimal.
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
  pub comment_id: String,
  pub author_handle: String,
  pub platform: Platform,
  pub truncated_text: String,
  pub total_score: f64,
  pub label: Label,
  pub reasons: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
  pub total: usize,
  pub pie_slices: Vec<PieSlice>,
  pub rows: Vec<ReportRow>,
}
