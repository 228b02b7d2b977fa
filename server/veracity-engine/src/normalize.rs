//! Normalize platform API fragments and CSV rows into canonical CommentRecords.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EngineError;
use crate::types::*;

const UNKNOWN_AUTHOR: &str = "Unknown";

const CSV_ID_COLUMNS: &[&str] = &["id", "comment_id", "commentId"];
const CSV_TEXT_COLUMNS: &[&str] = &["text", "comment", "message"];
const CSV_AUTHOR_COLUMNS: &[&str] = &["author", "user", "username"];
const CSV_TIME_COLUMNS: &[&str] = &["publishedAt", "time", "timestamp"];
const CSV_LIKE_COLUMNS: &[&str] = &["likeCount", "likes"];
const CSV_REPLY_COLUMNS: &[&str] = &["replyCount", "replies"];

/// Turn a raw record into a CommentRecord tagged with `platform`.
///
/// Missing optional fields become `None` (or "Unknown" for the author). Fails only when
/// the text field is absent entirely or no identifier can be derived.
pub fn normalize(raw: &RawRecord, platform: Platform) -> Result<CommentRecord, EngineError> {
  match raw {
    RawRecord::Api(c) => normalize_api(c, platform),
    RawRecord::Csv(row) => normalize_csv(row, platform),
  }
}

fn normalize_api(raw: &InboundComment, platform: Platform) -> Result<CommentRecord, EngineError> {
  let text = raw
    .body()
    .ok_or_else(|| EngineError::malformed("text", "field is absent"))?
    .trim()
    .to_string();

  let author_handle = non_empty(raw.author.as_deref())
    .or_else(|| non_empty(raw.from.as_ref().and_then(|f| f.name.as_deref())))
    .unwrap_or(UNKNOWN_AUTHOR)
    .to_string();

  let published = non_empty(raw.published_at.as_deref());
  let id = match non_empty(raw.id.as_deref()) {
    Some(id) => id.to_string(),
    None => derive_id(platform, &author_handle, &text, published.unwrap_or_default()),
  };

  Ok(CommentRecord {
    id,
    author_handle,
    text,
    timestamp: published.and_then(parse_timestamp),
    like_count: raw.like_count,
    reply_count: raw.reply_count,
    source_platform: platform,
  })
}

/// Whether `name` is a column header `normalize` understands for CSV rows.
pub(crate) fn is_csv_column(name: &str) -> bool {
  name == "platform"
    || [
      CSV_ID_COLUMNS,
      CSV_TEXT_COLUMNS,
      CSV_AUTHOR_COLUMNS,
      CSV_TIME_COLUMNS,
      CSV_LIKE_COLUMNS,
      CSV_REPLY_COLUMNS,
    ]
    .iter()
    .any(|cols| cols.contains(&name))
}

fn normalize_csv(row: &CsvRow, platform: Platform) -> Result<CommentRecord, EngineError> {
  let text = row
    .present_of(CSV_TEXT_COLUMNS)
    .ok_or_else(|| EngineError::malformed("text", "no text or comment column"))?
    .to_string();

  let id = match (row.first_of(CSV_ID_COLUMNS), row.row_number) {
    (Some(id), _) => id.to_string(),
    (None, Some(n)) => format!("row-{}", n),
    (None, None) => {
      return Err(EngineError::malformed(
        "id",
        "no id column and no row number to derive one from",
      ))
    }
  };

  Ok(CommentRecord {
    id,
    author_handle: row.first_of(CSV_AUTHOR_COLUMNS).unwrap_or(UNKNOWN_AUTHOR).to_string(),
    text,
    timestamp: row.first_of(CSV_TIME_COLUMNS).and_then(parse_timestamp),
    like_count: parse_count(row.first_of(CSV_LIKE_COLUMNS)),
    reply_count: parse_count(row.first_of(CSV_REPLY_COLUMNS)),
    source_platform: platform,
  })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_count(s: Option<&str>) -> Option<u64> {
  let s = s?;
  match s.parse::<u64>() {
    Ok(n) => Some(n),
    Err(_) => {
      tracing::debug!(value = s, "ignoring unparseable engagement count");
      None
    }
  }
}

/// Stable id for records the platform did not number: hash of platform + author + text + time.
fn derive_id(platform: Platform, author: &str, text: &str, published: &str) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(platform.as_str().as_bytes());
  hasher.update(b"|");
  hasher.update(author.as_bytes());
  hasher.update(b"|");
  hasher.update(text.as_bytes());
  hasher.update(b"|");
  hasher.update(published.as_bytes());
  let hex = hasher.finalize().to_hex();
  format!("cmt-{}", &hex[..16])
}

/// Accepts RFC 3339, Graph API style `+0000` offsets, and bare dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
  }
  tracing::debug!(value = s, "ignoring unparseable timestamp");
  None
}
