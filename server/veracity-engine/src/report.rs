//! Build the renderer payload (pie slices + per-comment rows) from a batch report.

use crate::config::ReportConfig;
use crate::types::*;

/// Shape a batch report for the PDF/chart renderer. Total over any batch, empty included.
pub fn build_report_data(batch: &BatchReport, config: &ReportConfig) -> ReportPayload {
  let total = batch.len();

  let pie_slices = if total == 0 {
    Vec::new()
  } else {
    Label::ALL
      .iter()
      .map(|&label| (label, batch.count(label)))
      .filter(|(_, count)| *count > 0)
      .map(|(label, count)| PieSlice {
        label,
        count,
        percentage: round1(count as f64 / total as f64 * 100.0),
      })
      .collect()
  };

  let mut verdicts: Vec<&Verdict> = batch.verdicts().iter().collect();
  if config.sort_by_score {
    // Stable sort: equal scores keep input order.
    verdicts.sort_by(|a, b| a.total_score.total_cmp(&b.total_score));
  }

  let rows = verdicts
    .into_iter()
    .map(|v| ReportRow {
      comment_id: v.comment.id.clone(),
      author_handle: v.comment.author_handle.clone(),
      platform: v.comment.source_platform,
      truncated_text: truncate(&v.comment.text, config.display_len, &config.ellipsis),
      total_score: v.total_score,
      label: v.label,
      reasons: v
        .findings
        .iter()
        .map(|f| f.reason.as_str())
        .collect::<Vec<_>>()
        .join(&config.reason_delimiter),
    })
    .collect();

  ReportPayload {
    total,
    pie_slices,
    rows,
  }
}

fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0 + 0.0
}

/// Keep at most `max_chars` chars, appending `ellipsis` when anything was cut.
pub fn truncate(text: &str, max_chars: usize, ellipsis: &str) -> String {
  match text.char_indices().nth(max_chars) {
    Some((cut, _)) => format!("{}{}", text[..cut].trim_end(), ellipsis),
    None => text.to_string(),
  }
}
