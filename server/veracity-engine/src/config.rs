//! Engine configuration with sane defaults.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only has
//! to name the values it overrides.

use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;
use crate::types::{Label, Platform};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub rules: RuleConfig,
  pub thresholds: Thresholds,
  pub report: ReportConfig,
}

impl Config {
  pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
    let config: Config = serde_json::from_str(s)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)
      .map_err(|e| EngineError::config(format!("read {}: {}", path.display(), e)))?;
    Self::from_json_str(&raw)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    self.thresholds.validate()?;
    self.rules.validate()?;
    self.report.validate()
  }
}

// ---------------------------------------------------------------------------
// Label thresholds
// ---------------------------------------------------------------------------

/// Score bands: `< low` inauthentic, `[low, high)` suspicious, `>= high` authentic.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
  pub low: f64,
  pub high: f64,
}

impl Default for Thresholds {
  fn default() -> Self {
    Self {
      low: -1.0,
      high: 0.5,
    }
  }
}

impl Thresholds {
  pub fn new(low: f64, high: f64) -> Result<Self, EngineError> {
    let t = Self { low, high };
    t.validate()?;
    Ok(t)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    if !self.low.is_finite() || !self.high.is_finite() {
      return Err(EngineError::config("thresholds must be finite"));
    }
    if self.low >= self.high {
      return Err(EngineError::config(format!(
        "thresholds.low ({}) must be below thresholds.high ({})",
        self.low, self.high
      )));
    }
    Ok(())
  }

  pub fn classify(&self, total_score: f64) -> Label {
    if total_score < self.low {
      Label::Inauthentic
    } else if total_score < self.high {
      Label::Suspicious
    } else {
      Label::Authentic
    }
  }
}

// ---------------------------------------------------------------------------
// Rule tuning
// ---------------------------------------------------------------------------

/// Tunable thresholds, keyword lists and score deltas for the standard rule set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
  /// Text shorter than this (in chars, trimmed) is "very short".
  pub min_chars: usize,
  pub short_delta: f64,
  /// Low-effort phrases, matched case-insensitively against the whole trimmed text.
  pub generic_phrases: Vec<String>,
  pub generic_delta: f64,

  /// Same character repeated this many times in a row.
  pub max_char_run: usize,
  /// Run of `!`, `?` or `.` this long.
  pub max_punct_run: usize,
  /// Share of words taken by the most frequent one.
  pub word_repeat_ratio: f64,
  /// Word ratio only applies to texts with at least this many words.
  pub word_repeat_min_words: usize,
  pub repetition_delta: f64,

  pub link_delta: f64,
  /// Digit runs at least this long look like phone numbers or IDs.
  pub min_phone_digits: usize,
  pub phone_delta: f64,
  pub promo_keywords: Vec<String>,
  pub promo_delta: f64,

  /// Share of non-alphanumeric, non-whitespace chars.
  pub symbol_ratio: f64,
  pub min_symbols: usize,
  pub symbol_delta: f64,

  /// Typical like count for a comment on the analysed post.
  pub engagement_baseline_likes: u64,
  /// Generic text with likes above baseline × factor looks amplified.
  pub engagement_anomaly_factor: f64,
  /// Typical reply count; generic text with replies above baseline × factor looks amplified too.
  pub engagement_baseline_replies: u64,
  pub engagement_delta: f64,
  /// Non-generic text with at least this many likes earns traction credit.
  pub traction_likes: u64,
  pub traction_delta: f64,
  /// Applied when the platform reports exactly zero likes. 0.0 turns it off.
  pub zero_likes_delta: f64,

  pub author_max_digits: usize,
  pub author_min_len: usize,
  pub author_keywords: Vec<String>,
  pub author_pattern_delta: f64,
  pub author_short_delta: f64,
  pub author_keyword_delta: f64,

  /// ISO 639-3 codes ("eng", "spa", ...) the audience is expected to write in.
  pub expected_languages: Vec<String>,
  /// Platforms where short comments in another language are penalized.
  pub language_platforms: Vec<Platform>,
  /// Only comments shorter than this many chars are checked against `expected_languages`.
  pub language_max_chars: usize,
  pub language_delta: f64,
  /// Applied when no language can be detected at all.
  pub language_unknown_delta: f64,

  pub positive_min_chars: usize,
  pub positive_delta: f64,
}

impl Default for RuleConfig {
  fn default() -> Self {
    let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Self {
      min_chars: 5,
      short_delta: -1.5,
      generic_phrases: strings(&[
        "nice", "first", "good", "great", "wow", "cool", "lol", "amazing", "awesome",
        "great video", "nice video", "nice post", "great post", "love it", "👍", "🔥",
      ]),
      generic_delta: -1.0,

      max_char_run: 7,
      max_punct_run: 3,
      word_repeat_ratio: 0.5,
      word_repeat_min_words: 4,
      repetition_delta: -0.6,

      link_delta: -1.5,
      min_phone_digits: 7,
      phone_delta: -0.5,
      promo_keywords: strings(&[
        "subscribe", "follow me", "dm for", "dm me", "check my", "check out my", "visit my",
        "contact me", "link in bio", "click the link", "free followers",
      ]),
      promo_delta: -1.2,

      symbol_ratio: 0.5,
      min_symbols: 3,
      symbol_delta: -0.8,

      engagement_baseline_likes: 25,
      engagement_anomaly_factor: 4.0,
      engagement_baseline_replies: 20,
      engagement_delta: -1.0,
      traction_likes: 25,
      traction_delta: 0.3,
      zero_likes_delta: -0.3,

      author_max_digits: 3,
      author_min_len: 3,
      author_keywords: strings(&["bot", "spam", "free", "promo"]),
      author_pattern_delta: -0.6,
      author_short_delta: -0.4,
      author_keyword_delta: -1.0,

      expected_languages: strings(&["eng"]),
      language_platforms: vec![Platform::Facebook, Platform::Instagram],
      language_max_chars: 20,
      language_delta: -0.5,
      language_unknown_delta: 0.0,

      positive_min_chars: 20,
      positive_delta: 1.0,
    }
  }
}

impl RuleConfig {
  pub fn validate(&self) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&self.word_repeat_ratio) {
      return Err(EngineError::config("rules.word_repeat_ratio must be within 0..=1"));
    }
    if !(0.0..=1.0).contains(&self.symbol_ratio) {
      return Err(EngineError::config("rules.symbol_ratio must be within 0..=1"));
    }
    if self.max_char_run < 2 || self.max_punct_run < 2 {
      return Err(EngineError::config("rules: run lengths must be at least 2"));
    }
    if self.min_phone_digits == 0 {
      return Err(EngineError::config("rules.min_phone_digits must be positive"));
    }
    let deltas = [
      self.short_delta,
      self.generic_delta,
      self.repetition_delta,
      self.link_delta,
      self.phone_delta,
      self.promo_delta,
      self.symbol_delta,
      self.engagement_delta,
      self.traction_delta,
      self.zero_likes_delta,
      self.author_pattern_delta,
      self.author_short_delta,
      self.author_keyword_delta,
      self.language_delta,
      self.language_unknown_delta,
      self.positive_delta,
      self.engagement_anomaly_factor,
    ];
    if deltas.iter().any(|d| !d.is_finite()) {
      return Err(EngineError::config("rules: score deltas must be finite"));
    }
    Ok(())
  }
}

// ---------------------------------------------------------------------------
// Report payload shaping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
  /// Max chars of comment text kept per row (ellipsis excluded).
  pub display_len: usize,
  pub ellipsis: String,
  pub reason_delimiter: String,
  /// List rows lowest score first instead of input order.
  pub sort_by_score: bool,
}

impl Default for ReportConfig {
  fn default() -> Self {
    Self {
      display_len: 80,
      ellipsis: "…".into(),
      reason_delimiter: "; ".into(),
      sort_by_score: false,
    }
  }
}

impl ReportConfig {
  pub fn validate(&self) -> Result<(), EngineError> {
    if self.display_len == 0 {
      return Err(EngineError::config("report.display_len must be positive"));
    }
    Ok(())
  }
}
