//! Heuristic rule set: independent evaluators that each emit zero or one finding.
//!
//! Rules never see each other's output. The positive-signal rule reuses the
//! detectors of the negative rules by composition, so "no spam markers" always
//! means the same thing as "those rules did not fire".

use regex::Regex;
use std::collections::HashMap;
use whatlang::Lang;

use crate::config::RuleConfig;
use crate::error::EngineError;
use crate::types::{CommentRecord, Platform, RuleFinding};

pub const LENGTH: &str = "length";
pub const REPETITION: &str = "repetition";
pub const LINK_PROMOTION: &str = "link_promotion";
pub const SYMBOL_DENSITY: &str = "symbol_density";
pub const ENGAGEMENT: &str = "engagement";
pub const AUTHOR_PATTERN: &str = "author_pattern";
pub const LANGUAGE: &str = "language";
pub const POSITIVE_SIGNAL: &str = "positive_signal";

const URL_PATTERN: &str = r"(?i)\bhttps?://\S+|\bwww\.\S+|\b[a-z0-9-]+\.(?:com|net|org|io|co|ly|me|xyz|info|biz|tv|gg)(?:/\S*)?\b";
const SPACED_PHONE_PATTERN: &str = r"\+?\b\d{3}[\s.-]\d{3}[\s.-]\d{4}\b";
const GENERIC_HANDLE_PATTERN: &str = r"(?i)user\d{2,}";

/// One heuristic: given a comment, produce zero or one finding.
pub trait Rule: Send + Sync {
  fn name(&self) -> &'static str;
  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding>;
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// Ordered collection of rules. Evaluation order is insertion order.
#[derive(Default)]
pub struct RuleSet {
  rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
  pub fn empty() -> Self {
    Self::default()
  }

  /// The standard heuristics in their fixed order.
  pub fn standard(config: &RuleConfig) -> Result<Self, EngineError> {
    config.validate()?;
    let repetition = RepetitionRule::new(config);
    let promotion = LinkPromotionRule::new(config)?;
    let symbols = SymbolDensityRule::new(config);
    Ok(
      Self::empty()
        .with_rule(LengthRule::new(config))
        .with_rule(repetition.clone())
        .with_rule(promotion.clone())
        .with_rule(symbols.clone())
        .with_rule(EngagementRule::new(config))
        .with_rule(AuthorPatternRule::new(config)?)
        .with_rule(LanguageRule::new(config)?)
        .with_rule(PositiveSignalRule {
          min_chars: config.positive_min_chars,
          delta: config.positive_delta,
          repetition,
          promotion,
          symbols,
        }),
    )
  }

  pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
    self.rules.push(Box::new(rule));
    self
  }

  /// Drop every rule with the given name; the rest keep their order.
  pub fn without(mut self, name: &str) -> Self {
    self.rules.retain(|r| r.name() != name);
    self
  }

  pub fn names(&self) -> Vec<&'static str> {
    self.rules.iter().map(|r| r.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Run every rule in order and keep the findings that fired.
  pub fn evaluate(&self, comment: &CommentRecord) -> Vec<RuleFinding> {
    self
      .rules
      .iter()
      .filter_map(|rule| {
        let finding = rule.evaluate(comment);
        if let Some(f) = &finding {
          tracing::trace!(comment = %comment.id, rule = %f.rule_name, delta = f.score_delta, "rule fired");
        }
        finding
      })
      .collect()
  }
}

// ---------------------------------------------------------------------------
// Text measurements
// ---------------------------------------------------------------------------

fn char_len(text: &str) -> usize {
  text.trim().chars().count()
}

fn words(text: &str) -> Vec<String> {
  text
    .split_whitespace()
    .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
    .filter(|w| !w.is_empty())
    .collect()
}

/// Longest run of one repeated character matching `pred`.
fn longest_run(text: &str, pred: impl Fn(char) -> bool) -> usize {
  let mut best = 0;
  let mut run = 0;
  let mut prev: Option<char> = None;
  for ch in text.chars() {
    if !pred(ch) {
      run = 0;
      prev = None;
      continue;
    }
    run = if prev == Some(ch) { run + 1 } else { 1 };
    prev = Some(ch);
    best = best.max(run);
  }
  best
}

/// Longest run of `!`, `?` or `.` in any mix.
fn longest_punct_run(text: &str) -> usize {
  let mut best = 0;
  let mut run = 0;
  for ch in text.chars() {
    if matches!(ch, '!' | '?' | '.') {
      run += 1;
      best = best.max(run);
    } else {
      run = 0;
    }
  }
  best
}

fn lowercase_all(xs: &[String]) -> Vec<String> {
  xs.iter().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect()
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

/// Alternation over the keywords. With `bounded`, a `\b` is added only on edges that are
/// word characters, so keywords like "$$$" or "👉 link" can still match.
fn keyword_regex(prefix: &str, keywords: &[String], bounded: bool) -> Result<Option<Regex>, EngineError> {
  let alts: Vec<String> = lowercase_all(keywords)
    .iter()
    .map(|k| {
      let escaped = regex::escape(k);
      if !bounded {
        return escaped;
      }
      let head = if k.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
      let tail = if k.chars().last().is_some_and(is_word_char) { r"\b" } else { "" };
      format!("{}{}{}", head, escaped, tail)
    })
    .collect();
  if alts.is_empty() {
    return Ok(None);
  }
  Ok(Some(Regex::new(&format!("{}(?:{})", prefix, alts.join("|")))?))
}

/// Whole-text match against a list of low-effort phrases.
#[derive(Debug, Clone)]
struct GenericPhrases(Vec<String>);

impl GenericPhrases {
  fn new(phrases: &[String]) -> Self {
    Self(lowercase_all(phrases))
  }

  fn matches(&self, text: &str) -> bool {
    let t = text
      .trim()
      .to_lowercase()
      .trim_end_matches(['!', '.', '?', ' '])
      .to_string();
    !t.is_empty() && self.0.iter().any(|p| *p == t)
  }
}

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LengthRule {
  min_chars: usize,
  short_delta: f64,
  generic: GenericPhrases,
  generic_delta: f64,
}

impl LengthRule {
  pub fn new(config: &RuleConfig) -> Self {
    Self {
      min_chars: config.min_chars,
      short_delta: config.short_delta,
      generic: GenericPhrases::new(&config.generic_phrases),
      generic_delta: config.generic_delta,
    }
  }
}

impl Rule for LengthRule {
  fn name(&self) -> &'static str {
    LENGTH
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let len = char_len(&comment.text);
    if len < self.min_chars {
      return Some(RuleFinding::new(
        LENGTH,
        self.short_delta,
        format!("Very short comment ({} chars); often low-effort or bot-like", len),
      ));
    }
    if self.generic.matches(&comment.text) {
      return Some(RuleFinding::new(
        LENGTH,
        self.generic_delta,
        "Generic praise with no specific content",
      ));
    }
    None
  }
}

// ---------------------------------------------------------------------------
// Repetition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RepetitionRule {
  max_char_run: usize,
  max_punct_run: usize,
  word_ratio: f64,
  min_words: usize,
  delta: f64,
}

impl RepetitionRule {
  pub fn new(config: &RuleConfig) -> Self {
    Self {
      max_char_run: config.max_char_run,
      max_punct_run: config.max_punct_run,
      word_ratio: config.word_repeat_ratio,
      min_words: config.word_repeat_min_words,
      delta: config.repetition_delta,
    }
  }

  fn signals(&self, text: &str) -> Vec<String> {
    let mut out = Vec::new();

    let run = longest_run(text, |c| !c.is_whitespace());
    if run >= self.max_char_run {
      out.push(format!("same character repeated {} times", run));
    }
    if longest_punct_run(text) >= self.max_punct_run {
      out.push("excessive punctuation".to_string());
    }

    let ws = words(text);
    if ws.len() >= self.min_words {
      let mut freq: HashMap<&str, usize> = HashMap::new();
      for w in &ws {
        *freq.entry(w.as_str()).or_insert(0) += 1;
      }
      // Ties resolve to the alphabetically first word so reasons are reproducible.
      if let Some((word, n)) = freq
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
      {
        let ratio = n as f64 / ws.len() as f64;
        if n > 1 && ratio >= self.word_ratio {
          out.push(format!("\"{}\" is {:.0}% of the words", word, ratio * 100.0));
        }
      }
    }
    out
  }
}

impl Rule for RepetitionRule {
  fn name(&self) -> &'static str {
    REPETITION
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let signals = self.signals(&comment.text);
    if signals.is_empty() {
      return None;
    }
    Some(RuleFinding::new(
      REPETITION,
      self.delta,
      format!("Repetitive text: {}", signals.join(", ")),
    ))
  }
}

// ---------------------------------------------------------------------------
// Links, phone numbers, promotion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LinkPromotionRule {
  url: Regex,
  phone: Vec<Regex>,
  promo: Option<Regex>,
  link_delta: f64,
  phone_delta: f64,
  promo_delta: f64,
}

impl LinkPromotionRule {
  pub fn new(config: &RuleConfig) -> Result<Self, EngineError> {
    Ok(Self {
      url: Regex::new(URL_PATTERN)?,
      phone: vec![
        Regex::new(&format!(r"\b\d{{{},}}\b", config.min_phone_digits))?,
        Regex::new(SPACED_PHONE_PATTERN)?,
      ],
      promo: keyword_regex("(?i)", &config.promo_keywords, true)?,
      link_delta: config.link_delta,
      phone_delta: config.phone_delta,
      promo_delta: config.promo_delta,
    })
  }
}

impl Rule for LinkPromotionRule {
  fn name(&self) -> &'static str {
    LINK_PROMOTION
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let text = &comment.text;
    let mut delta = 0.0;
    let mut parts = Vec::new();

    if self.url.is_match(text) {
      delta += self.link_delta;
      parts.push("contains a URL or web link".to_string());
    }
    if self.phone.iter().any(|re| re.is_match(text)) {
      delta += self.phone_delta;
      parts.push("contains a phone number or long ID".to_string());
    }
    if let Some(m) = self.promo.as_ref().and_then(|re| re.find(text)) {
      delta += self.promo_delta;
      parts.push(format!("call-to-action \"{}\"", m.as_str().to_lowercase()));
    }

    if parts.is_empty() {
      return None;
    }
    Some(RuleFinding::new(
      LINK_PROMOTION,
      delta,
      format!("Promotional content: {}", parts.join(", ")),
    ))
  }
}

// ---------------------------------------------------------------------------
// Emoji / symbol density
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SymbolDensityRule {
  ratio: f64,
  min_symbols: usize,
  delta: f64,
}

impl SymbolDensityRule {
  pub fn new(config: &RuleConfig) -> Self {
    Self {
      ratio: config.symbol_ratio,
      min_symbols: config.min_symbols,
      delta: config.symbol_delta,
    }
  }

  /// Symbol share of non-whitespace chars, when it crosses the threshold.
  fn dense_ratio(&self, text: &str) -> Option<f64> {
    let (symbols, visible) = text
      .chars()
      .filter(|c| !c.is_whitespace())
      .fold((0usize, 0usize), |(s, v), c| {
        (s + usize::from(!c.is_alphanumeric()), v + 1)
      });
    if visible == 0 || symbols < self.min_symbols {
      return None;
    }
    let ratio = symbols as f64 / visible as f64;
    (ratio >= self.ratio).then_some(ratio)
  }
}

impl Rule for SymbolDensityRule {
  fn name(&self) -> &'static str {
    SYMBOL_DENSITY
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let ratio = self.dense_ratio(&comment.text)?;
    Some(RuleFinding::new(
      SYMBOL_DENSITY,
      self.delta,
      format!(
        "High emoji/symbol density ({:.0}% of characters); low-effort engagement",
        ratio * 100.0
      ),
    ))
  }
}

// ---------------------------------------------------------------------------
// Engagement consistency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngagementRule {
  generic: GenericPhrases,
  min_chars: usize,
  baseline_likes: u64,
  baseline_replies: u64,
  factor: f64,
  delta: f64,
  traction_likes: u64,
  traction_delta: f64,
  zero_likes_delta: f64,
}

impl EngagementRule {
  pub fn new(config: &RuleConfig) -> Self {
    Self {
      generic: GenericPhrases::new(&config.generic_phrases),
      min_chars: config.min_chars,
      baseline_likes: config.engagement_baseline_likes,
      baseline_replies: config.engagement_baseline_replies,
      factor: config.engagement_anomaly_factor,
      delta: config.engagement_delta,
      traction_likes: config.traction_likes,
      traction_delta: config.traction_delta,
      zero_likes_delta: config.zero_likes_delta,
    }
  }

  fn looks_generic(&self, text: &str) -> bool {
    self.generic.matches(text) || char_len(text) < self.min_chars || words(text).len() <= 2
  }
}

impl Rule for EngagementRule {
  fn name(&self) -> &'static str {
    ENGAGEMENT
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    if comment.like_count.is_none() && comment.reply_count.is_none() {
      return None;
    }
    let likes = comment.like_count.unwrap_or(0);
    let replies = comment.reply_count.unwrap_or(0);

    let generic = self.looks_generic(&comment.text);
    if generic {
      let like_limit = self.baseline_likes as f64 * self.factor;
      let reply_limit = self.baseline_replies as f64 * self.factor;
      if likes as f64 > like_limit || replies as f64 > reply_limit {
        return Some(RuleFinding::new(
          ENGAGEMENT,
          self.delta,
          format!(
            "Generic text with anomalously high engagement ({} likes, {} replies vs baseline {}); possible amplification",
            likes, replies, self.baseline_likes
          ),
        ));
      }
    }

    // A zero delta switches the no-likes signal off.
    if comment.like_count == Some(0) && self.zero_likes_delta != 0.0 {
      return Some(RuleFinding::new(
        ENGAGEMENT,
        self.zero_likes_delta,
        "No likes; no social validation (weak signal)",
      ));
    }

    if !generic && likes >= self.traction_likes {
      return Some(RuleFinding::new(
        ENGAGEMENT,
        self.traction_delta,
        format!("High likes ({}); social traction suggests authenticity", likes),
      ));
    }
    None
  }
}

// ---------------------------------------------------------------------------
// Author handle pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AuthorPatternRule {
  max_digits: usize,
  min_len: usize,
  generic_handle: Regex,
  keywords: Option<Regex>,
  pattern_delta: f64,
  short_delta: f64,
  keyword_delta: f64,
}

impl AuthorPatternRule {
  pub fn new(config: &RuleConfig) -> Result<Self, EngineError> {
    Ok(Self {
      max_digits: config.author_max_digits,
      min_len: config.author_min_len,
      generic_handle: Regex::new(GENERIC_HANDLE_PATTERN)?,
      keywords: keyword_regex("(?i)", &config.author_keywords, false)?,
      pattern_delta: config.author_pattern_delta,
      short_delta: config.author_short_delta,
      keyword_delta: config.author_keyword_delta,
    })
  }
}

impl Rule for AuthorPatternRule {
  fn name(&self) -> &'static str {
    AUTHOR_PATTERN
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let handle = comment.author_handle.trim();
    if handle.is_empty() {
      return None;
    }
    let mut delta = 0.0;
    let mut parts = Vec::new();

    let digits = handle.chars().filter(|c| c.is_ascii_digit()).count();
    if digits >= self.max_digits || self.generic_handle.is_match(handle) {
      delta += self.pattern_delta;
      parts.push("many digits or a generic user-number pattern");
    }
    if handle.chars().count() < self.min_len && handle.chars().all(char::is_alphabetic) {
      delta += self.short_delta;
      parts.push("suspiciously short");
    }
    if self.keywords.as_ref().is_some_and(|re| re.is_match(handle)) {
      delta += self.keyword_delta;
      parts.push("contains bot/promo keywords");
    }

    if parts.is_empty() {
      return None;
    }
    Some(RuleFinding::new(
      AUTHOR_PATTERN,
      delta,
      format!("Author handle {}", parts.join(", ")),
    ))
  }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Flags text whose language cannot be detected, and short comments in an
/// unexpected language on platforms where that is a known spam pattern.
#[derive(Debug, Clone)]
pub struct LanguageRule {
  expected: Vec<Lang>,
  platforms: Vec<Platform>,
  max_chars: usize,
  unknown_delta: f64,
  unexpected_delta: f64,
}

impl LanguageRule {
  pub fn new(config: &RuleConfig) -> Result<Self, EngineError> {
    let expected = config
      .expected_languages
      .iter()
      .map(|code| {
        Lang::from_code(code.trim().to_ascii_lowercase())
          .ok_or_else(|| EngineError::config(format!("rules.expected_languages: unknown code {}", code)))
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self {
      expected,
      platforms: config.language_platforms.clone(),
      max_chars: config.language_max_chars,
      unknown_delta: config.language_unknown_delta,
      unexpected_delta: config.language_delta,
    })
  }
}

impl Rule for LanguageRule {
  fn name(&self) -> &'static str {
    LANGUAGE
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    let Some(info) = whatlang::detect(comment.text.trim()) else {
      return Some(RuleFinding::new(
        LANGUAGE,
        self.unknown_delta,
        "Language could not be reliably detected",
      ));
    };
    let lang = info.lang();
    if self.expected.is_empty()
      || self.expected.contains(&lang)
      || !self.platforms.contains(&comment.source_platform)
      || char_len(&comment.text) >= self.max_chars
    {
      return None;
    }
    Some(RuleFinding::new(
      LANGUAGE,
      self.unexpected_delta,
      format!(
        "Short comment in an unexpected language ({}) for this platform (weak signal)",
        lang.code()
      ),
    ))
  }
}

// ---------------------------------------------------------------------------
// Positive signal
// ---------------------------------------------------------------------------

/// Baseline credit for substantive text with none of the spam markers.
#[derive(Debug, Clone)]
pub struct PositiveSignalRule {
  min_chars: usize,
  delta: f64,
  repetition: RepetitionRule,
  promotion: LinkPromotionRule,
  symbols: SymbolDensityRule,
}

impl PositiveSignalRule {
  pub fn new(config: &RuleConfig) -> Result<Self, EngineError> {
    Ok(Self {
      min_chars: config.positive_min_chars,
      delta: config.positive_delta,
      repetition: RepetitionRule::new(config),
      promotion: LinkPromotionRule::new(config)?,
      symbols: SymbolDensityRule::new(config),
    })
  }
}

impl Rule for PositiveSignalRule {
  fn name(&self) -> &'static str {
    POSITIVE_SIGNAL
  }

  fn evaluate(&self, comment: &CommentRecord) -> Option<RuleFinding> {
    if char_len(&comment.text) < self.min_chars
      || self.promotion.evaluate(comment).is_some()
      || self.repetition.evaluate(comment).is_some()
      || self.symbols.evaluate(comment).is_some()
    {
      return None;
    }
    Some(RuleFinding::new(
      POSITIVE_SIGNAL,
      self.delta,
      "Substantive comment with no links, repetition or symbol spam",
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Platform;

  fn comment(text: &str) -> CommentRecord {
    CommentRecord {
      id: "c1".into(),
      author_handle: "dana".into(),
      text: text.into(),
      timestamp: None,
      like_count: None,
      reply_count: None,
      source_platform: Platform::YouTube,
    }
  }

  fn standard() -> RuleSet {
    RuleSet::standard(&RuleConfig::default()).unwrap()
  }

  #[test]
  fn standard_order_is_fixed() {
    assert_eq!(
      standard().names(),
      vec![
        LENGTH,
        REPETITION,
        LINK_PROMOTION,
        SYMBOL_DENSITY,
        ENGAGEMENT,
        AUTHOR_PATTERN,
        LANGUAGE,
        POSITIVE_SIGNAL
      ]
    );
  }

  #[test]
  fn without_removes_only_named_rule() {
    let rules = standard().without(AUTHOR_PATTERN);
    assert_eq!(rules.len(), 7);
    assert!(!rules.names().contains(&AUTHOR_PATTERN));
    assert_eq!(rules.names()[0], LENGTH);
  }

  #[test]
  fn length_rule_short_and_generic() {
    let rule = LengthRule::new(&RuleConfig::default());
    let f = rule.evaluate(&comment("a")).unwrap();
    assert!(f.score_delta < 0.0);
    assert!(f.reason.contains("1 chars"));

    let f = rule.evaluate(&comment("Great video!")).unwrap();
    assert_eq!(f.score_delta, RuleConfig::default().generic_delta);

    assert!(rule.evaluate(&comment("This changed my perspective.")).is_none());
  }

  #[test]
  fn empty_text_counts_as_very_short() {
    let rule = LengthRule::new(&RuleConfig::default());
    assert!(rule.evaluate(&comment("")).is_some());
  }

  #[test]
  fn repetition_rule_signals() {
    let rule = RepetitionRule::new(&RuleConfig::default());
    assert!(rule.evaluate(&comment("wooooooooow")).is_some());
    assert!(rule.evaluate(&comment("Call now for deals!!!")).is_some());
    let f = rule.evaluate(&comment("buy buy buy buy now")).unwrap();
    assert!(f.reason.contains("\"buy\""));
    assert!(rule.evaluate(&comment("a calm and ordinary sentence")).is_none());
    // Six identical emoji are below the run threshold.
    assert!(rule.evaluate(&comment("😂😂😂😂😂😂")).is_none());
  }

  #[test]
  fn link_promotion_rule_combines_signals() {
    let cfg = RuleConfig::default();
    let rule = LinkPromotionRule::new(&cfg).unwrap();
    let f = rule.evaluate(&comment("Subscribe to my channel! http://x.co")).unwrap();
    assert!((f.score_delta - (cfg.link_delta + cfg.promo_delta)).abs() < 1e-9);
    assert!(f.reason.contains("URL"));
    assert!(f.reason.contains("subscribe"));

    let f = rule.evaluate(&comment("Call now 1234567890 for deals")).unwrap();
    assert!((f.score_delta - cfg.phone_delta).abs() < 1e-9);

    assert!(rule.evaluate(&comment("Visit example.com today")).is_some());
    assert!(rule.evaluate(&comment("The part at 3:20 was great")).is_none());
    // Keywords match whole words only.
    assert!(rule.evaluate(&comment("My subscribers grew fast this year")).is_none());
  }

  #[test]
  fn symbol_density_rule() {
    let rule = SymbolDensityRule::new(&RuleConfig::default());
    let f = rule.evaluate(&comment("😂😂😂😂😂😂")).unwrap();
    assert!(f.reason.contains("100%"));
    assert!(rule.evaluate(&comment("ok :)")).is_none());
    assert!(rule.evaluate(&comment("Fine, thanks!")).is_none());
  }

  #[test]
  fn engagement_rule_needs_metadata() {
    let rule = EngagementRule::new(&RuleConfig::default());
    assert!(rule.evaluate(&comment("nice")).is_none());

    let mut c = comment("nice");
    c.like_count = Some(5000);
    let f = rule.evaluate(&c).unwrap();
    assert!(f.score_delta < 0.0);
    assert!(f.reason.contains("amplification"));

    let mut c = comment("nice");
    c.reply_count = Some(500);
    assert!(rule.evaluate(&c).unwrap().score_delta < 0.0);

    let mut c = comment("This was a genuinely useful walkthrough");
    c.like_count = Some(40);
    assert!(rule.evaluate(&c).unwrap().score_delta > 0.0);

    c.like_count = Some(3);
    assert!(rule.evaluate(&c).is_none());
  }

  #[test]
  fn engagement_rule_penalizes_zero_likes() {
    let cfg = RuleConfig::default();
    let rule = EngagementRule::new(&cfg);
    let mut c = comment("This was a genuinely useful walkthrough");
    c.like_count = Some(0);
    let f = rule.evaluate(&c).unwrap();
    assert_eq!(f.score_delta, cfg.zero_likes_delta);
    assert!(f.reason.contains("No likes"));

    // Replies alone say nothing about likes.
    let mut c = comment("nice");
    c.reply_count = Some(0);
    assert!(rule.evaluate(&c).is_none());

    let off = EngagementRule::new(&RuleConfig {
      zero_likes_delta: 0.0,
      ..RuleConfig::default()
    });
    let mut c = comment("nice");
    c.like_count = Some(0);
    assert!(off.evaluate(&c).is_none());
  }

  #[test]
  fn language_rule_reports_undetectable_text() {
    let rule = LanguageRule::new(&RuleConfig::default()).unwrap();
    let f = rule.evaluate(&comment("😂😂😂")).unwrap();
    assert_eq!(f.reason, "Language could not be reliably detected");
    assert_eq!(f.score_delta, RuleConfig::default().language_unknown_delta);
    assert!(rule
      .evaluate(&comment("I really appreciated the explanation, it clarified the edge case"))
      .is_none());
  }

  #[test]
  fn language_rule_flags_short_foreign_text_on_listed_platforms() {
    let cfg = RuleConfig::default();
    let rule = LanguageRule::new(&cfg).unwrap();
    let mut c = comment("Привет всем друзья");
    c.source_platform = Platform::Facebook;
    let f = rule.evaluate(&c).unwrap();
    assert_eq!(f.score_delta, cfg.language_delta);
    assert!(f.reason.contains("unexpected language"));

    // Not a listed platform.
    c.source_platform = Platform::YouTube;
    assert!(rule.evaluate(&c).is_none());

    // Long enough to be past the cutoff.
    let mut long = comment("Привет всем друзья, это очень интересное и полезное видео");
    long.source_platform = Platform::Instagram;
    assert!(rule.evaluate(&long).is_none());
  }

  #[test]
  fn language_rule_rejects_unknown_codes() {
    let cfg = RuleConfig {
      expected_languages: vec!["klingon".into()],
      ..RuleConfig::default()
    };
    assert!(LanguageRule::new(&cfg).is_err());
  }

  #[test]
  fn keywords_with_symbol_edges_still_match() {
    let cfg = RuleConfig {
      promo_keywords: vec!["$$$".into(), "👉 link".into(), "subscribe".into()],
      ..RuleConfig::default()
    };
    let rule = LinkPromotionRule::new(&cfg).unwrap();
    assert!(rule.evaluate(&comment("Easy $$$ from home")).is_some());
    assert!(rule.evaluate(&comment("details 👉 link below")).is_some());
    assert!(rule.evaluate(&comment("Please subscribe")).is_some());
    assert!(rule.evaluate(&comment("my subscribers grew")).is_none());
  }

  #[test]
  fn author_pattern_rule() {
    let rule = AuthorPatternRule::new(&RuleConfig::default()).unwrap();
    let mut c = comment("hello there friend");
    c.author_handle = "SpamBot789".into();
    let f = rule.evaluate(&c).unwrap();
    assert!(f.reason.contains("digits"));
    assert!(f.reason.contains("keywords"));

    c.author_handle = "user42".into();
    assert!(rule.evaluate(&c).is_some());

    c.author_handle = "Jo".into();
    assert!(rule.evaluate(&c).unwrap().reason.contains("short"));

    c.author_handle = "RealFan".into();
    assert!(rule.evaluate(&c).is_none());
  }

  #[test]
  fn positive_signal_requires_clean_substantive_text() {
    let rule = PositiveSignalRule::new(&RuleConfig::default()).unwrap();
    assert!(rule
      .evaluate(&comment(
        "I really appreciated the explanation at 3:20, it clarified the edge case for me"
      ))
      .is_some());
    assert!(rule.evaluate(&comment("short one")).is_none());
    assert!(rule
      .evaluate(&comment("Check the full writeup at https://example.com/post"))
      .is_none());
    assert!(rule
      .evaluate(&comment("this is sooooooooo good, really really good"))
      .is_none());
  }

  #[test]
  fn custom_rule_can_be_appended() {
    struct AlwaysZero;
    impl Rule for AlwaysZero {
      fn name(&self) -> &'static str {
        "always_zero"
      }
      fn evaluate(&self, _: &CommentRecord) -> Option<RuleFinding> {
        Some(RuleFinding::new("always_zero", 0.0, "noop"))
      }
    }
    let rules = standard().with_rule(AlwaysZero);
    let findings = rules.evaluate(&comment("a"));
    assert_eq!(findings.first().map(|f| f.rule_name.as_str()), Some(LENGTH));
    assert_eq!(findings.last().map(|f| f.rule_name.as_str()), Some("always_zero"));
  }
}
