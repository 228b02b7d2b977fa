//! Read comment CSV files into `CsvRow`s.
//!
//! A first row made of known column names is taken as the header. Otherwise every
//! row is positional: author, text, publishedAt, likeCount, platform.

use std::collections::HashMap;
use std::io::Read;

use crate::error::EngineError;
use crate::normalize::is_csv_column;
use crate::types::CsvRow;

const POSITIONAL_COLUMNS: &[&str] = &["author", "text", "publishedAt", "likeCount", "platform"];

/// One entry per data row, numbered from 1. A bad row is an `Err` in its slot and
/// does not stop the rest; an unreadable stream fails as a whole.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Result<CsvRow, EngineError>>, EngineError> {
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let mut records = rdr.records();
  let first = match records.next() {
    Some(first) => first?,
    None => return Ok(Vec::new()),
  };

  let header: Option<Vec<String>> = if first.iter().any(is_csv_column) {
    Some(first.iter().map(str::to_string).collect())
  } else {
    None
  };

  let mut rows = Vec::new();
  if header.is_none() {
    rows.push(positional(1, &first));
  }
  for record in records {
    let row_number = rows.len() + 1;
    let row = match (record, &header) {
      (Err(e), _) => Err(EngineError::from(e)),
      (Ok(r), Some(names)) => Ok(keyed(row_number, names, &r)),
      (Ok(r), None) => positional(row_number, &r),
    };
    rows.push(row);
  }
  tracing::debug!(rows = rows.len(), header = header.is_some(), "read csv input");
  Ok(rows)
}

fn keyed(row_number: usize, names: &[String], record: &csv::StringRecord) -> CsvRow {
  let fields: HashMap<String, String> = names
    .iter()
    .zip(record.iter())
    .map(|(k, v)| (k.clone(), v.to_string()))
    .collect();
  CsvRow::new(Some(row_number), fields)
}

fn positional(row_number: usize, record: &csv::StringRecord) -> Result<CsvRow, EngineError> {
  if record.len() < 2 {
    return Err(EngineError::malformed(
      "text",
      &format!("row {} has fewer than 2 columns", row_number),
    ));
  }
  let fields: HashMap<String, String> = POSITIONAL_COLUMNS
    .iter()
    .zip(record.iter())
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
  Ok(CsvRow::new(Some(row_number), fields))
}
