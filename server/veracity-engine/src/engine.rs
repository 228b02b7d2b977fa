//! Scoring aggregator: rule findings -> verdict per comment -> batch report.

use crate::config::{Config, ReportConfig, Thresholds};
use crate::error::EngineError;
use crate::report;
use crate::rules::RuleSet;
use crate::types::*;

/// Score one comment: evaluate every rule in order, sum the deltas, classify.
pub fn score(comment: &CommentRecord, rules: &RuleSet, thresholds: &Thresholds) -> Verdict {
  let findings = rules.evaluate(comment);
  let total_score = findings.iter().fold(0.0, |acc, f| acc + f.score_delta);
  let label = thresholds.classify(total_score);
  tracing::debug!(
    comment = %comment.id,
    score = total_score,
    label = %label,
    findings = findings.len(),
    "scored comment"
  );
  Verdict {
    comment: comment.clone(),
    total_score,
    label,
    findings,
  }
}

/// Score each comment independently; verdicts keep input order.
pub fn score_batch(comments: &[CommentRecord], rules: &RuleSet, thresholds: &Thresholds) -> BatchReport {
  let verdicts: Vec<Verdict> = comments.iter().map(|c| score(c, rules, thresholds)).collect();
  let batch = BatchReport::new(verdicts);
  tracing::debug!(
    total = batch.len(),
    authentic = batch.count(Label::Authentic),
    suspicious = batch.count(Label::Suspicious),
    inauthentic = batch.count(Label::Inauthentic),
    "scored batch"
  );
  batch
}

/// Rule set, thresholds and report shaping bundled for callers that want one handle.
/// Holds no per-comment state.
pub struct Engine {
  rules: RuleSet,
  thresholds: Thresholds,
  report: ReportConfig,
}

impl Engine {
  pub fn new(config: Config) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self {
      rules: RuleSet::standard(&config.rules)?,
      thresholds: config.thresholds,
      report: config.report,
    })
  }

  pub fn with_defaults() -> Result<Self, EngineError> {
    Self::new(Config::default())
  }

  /// Use a caller-assembled rule set instead of the standard one.
  pub fn with_rules(mut self, rules: RuleSet) -> Self {
    self.rules = rules;
    self
  }

  pub fn rules(&self) -> &RuleSet {
    &self.rules
  }

  pub fn thresholds(&self) -> &Thresholds {
    &self.thresholds
  }

  pub fn score(&self, comment: &CommentRecord) -> Verdict {
    score(comment, &self.rules, &self.thresholds)
  }

  pub fn score_batch(&self, comments: &[CommentRecord]) -> BatchReport {
    score_batch(comments, &self.rules, &self.thresholds)
  }

  pub fn build_report(&self, batch: &BatchReport) -> ReportPayload {
    report::build_report_data(batch, &self.report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Platform, RuleFinding};
  use crate::rules::Rule;

  fn comment(id: &str, text: &str) -> CommentRecord {
    CommentRecord {
      id: id.into(),
      author_handle: "dana".into(),
      text: text.into(),
      timestamp: None,
      like_count: None,
      reply_count: None,
      source_platform: Platform::YouTube,
    }
  }

  /// Emits a fixed delta for every comment.
  struct Fixed(f64);

  impl Rule for Fixed {
    fn name(&self) -> &'static str {
      "fixed"
    }
    fn evaluate(&self, _: &CommentRecord) -> Option<RuleFinding> {
      Some(RuleFinding::new("fixed", self.0, "fixed delta"))
    }
  }

  #[test]
  fn label_at_exact_thresholds() {
    let t = Thresholds::default();
    let at_low = score(&comment("a", "x"), &RuleSet::empty().with_rule(Fixed(t.low)), &t);
    assert_eq!(at_low.label, Label::Suspicious);
    let at_high = score(&comment("a", "x"), &RuleSet::empty().with_rule(Fixed(t.high)), &t);
    assert_eq!(at_high.label, Label::Authentic);
  }

  #[test]
  fn no_findings_scores_zero() {
    let v = score(&comment("a", "anything"), &RuleSet::empty(), &Thresholds::default());
    assert!(v.findings.is_empty());
    assert_eq!(v.total_score, 0.0);
    assert_eq!(v.label, Label::Suspicious);
  }

  #[test]
  fn deltas_are_summed() {
    let rules = RuleSet::empty().with_rule(Fixed(0.4)).with_rule(Fixed(0.4));
    let v = score(&comment("a", "x"), &rules, &Thresholds::default());
    assert_eq!(v.findings.len(), 2);
    assert!((v.total_score - 0.8).abs() < 1e-9);
    assert_eq!(v.label, Label::Authentic);
  }

  #[test]
  fn single_char_is_inauthentic() {
    let engine = Engine::with_defaults().unwrap();
    let v = engine.score(&comment("a", "a"));
    assert_eq!(v.findings[0].rule_name, crate::rules::LENGTH);
    assert_eq!(v.label, Label::Inauthentic);
  }

  #[test]
  fn promotional_link_is_inauthentic() {
    let engine = Engine::with_defaults().unwrap();
    let v = engine.score(&comment("p", "Subscribe to my channel! http://x.co"));
    let names: Vec<&str> = v.findings.iter().map(|f| f.rule_name.as_str()).collect();
    assert!(names.contains(&crate::rules::LINK_PROMOTION));
    assert!(!names.contains(&crate::rules::LENGTH));
    assert!(v.total_score < engine.thresholds().low);
    assert_eq!(v.label, Label::Inauthentic);
  }

  #[test]
  fn substantive_comment_is_authentic() {
    let engine = Engine::with_defaults().unwrap();
    let v = engine.score(&comment(
      "g",
      "I really appreciated the explanation at 3:20, it clarified the edge case for me",
    ));
    assert_eq!(v.findings.len(), 1);
    assert_eq!(v.findings[0].rule_name, crate::rules::POSITIVE_SIGNAL);
    assert_eq!(v.label, Label::Authentic);
  }

  #[test]
  fn emoji_only_is_not_authentic() {
    let engine = Engine::with_defaults().unwrap();
    let v = engine.score(&comment("e", "😂😂😂😂😂😂"));
    assert!(v
      .findings
      .iter()
      .any(|f| f.rule_name == crate::rules::SYMBOL_DENSITY && f.score_delta < 0.0));
    assert!(matches!(v.label, Label::Suspicious | Label::Inauthentic));
  }

  #[test]
  fn batch_preserves_order_and_tallies() {
    let engine = Engine::with_defaults().unwrap();
    let comments = vec![
      comment("1", "a"),
      comment("2", "I really appreciated the explanation at 3:20, it clarified the edge case for me"),
      comment("3", "😂😂😂😂😂😂"),
    ];
    let batch = engine.score_batch(&comments);
    let ids: Vec<&str> = batch.verdicts().iter().map(|v| v.comment.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(batch.counts().values().sum::<usize>(), batch.len());
    assert_eq!(batch.count(Label::Authentic), 1);
  }

  #[test]
  fn batch_is_deterministic() {
    let engine = Engine::with_defaults().unwrap();
    let comments = vec![comment("1", "nice"), comment("2", "Follow me for more!!!")];
    assert_eq!(engine.score_batch(&comments), engine.score_batch(&comments));
  }

  #[test]
  fn empty_batch_has_zero_counts() {
    let engine = Engine::with_defaults().unwrap();
    let batch = engine.score_batch(&[]);
    assert!(batch.is_empty());
    assert_eq!(batch.counts().len(), 3);
    assert!(batch.counts().values().all(|&n| n == 0));
  }
}
