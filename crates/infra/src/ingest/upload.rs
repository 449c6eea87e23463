use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use trendshelf_core::BookRecord;

use super::IngestError;
use super::columns::{normalize_columns, ColumnMap};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Json,
    /// `.xlsx` or `.xls`; only the first sheet is read.
    Excel,
}

impl UploadFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn detect(filename: &str) -> Result<Self, IngestError> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".json") {
            Ok(Self::Json)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Excel)
        } else {
            Err(IngestError::UnsupportedFormat(filename.to_string()))
        }
    }
}

/// Parse an uploaded file into records, dropping rows without title/author/category.
pub fn parse_upload(filename: &str, bytes: &[u8]) -> Result<Vec<BookRecord>, IngestError> {
    match UploadFormat::detect(filename)? {
        UploadFormat::Csv => parse_csv(bytes),
        UploadFormat::Json => parse_json(bytes),
        UploadFormat::Excel => parse_excel(bytes),
    }
}

pub fn parse_csv(bytes: &[u8]) -> Result<Vec<BookRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = normalize_columns(&headers)?;

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping malformed csv row");
                continue;
            }
        };
        if let Some(record) = build_record(&columns, |i| row.get(i).map(str::to_string), line + 1) {
            records.push(record);
        }
    }

    debug!(rows = records.len(), "parsed csv upload");
    Ok(records)
}

/// A JSON array of objects; keys go through the same column normalization as CSV headers.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<BookRecord>, IngestError> {
    let rows: Vec<Map<String, Value>> = serde_json::from_slice(bytes)?;

    let mut headers: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let columns = normalize_columns(&headers)?;

    let records: Vec<BookRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(line, row)| {
            build_record(&columns, |i| row.get(&headers[i]).and_then(cell_text), line + 1)
        })
        .collect();

    debug!(rows = records.len(), "parsed json upload");
    Ok(records)
}

/// First worksheet of a workbook; the first row holds the headers.
pub fn parse_excel(bytes: &[u8]) -> Result<Vec<BookRecord>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            warn!("workbook has no worksheets");
            Default::default()
        }
    };

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| excel_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();
    let columns = normalize_columns(&headers)?;

    let records: Vec<BookRecord> = rows
        .enumerate()
        .filter_map(|(line, row)| build_record(&columns, |i| row.get(i).and_then(excel_text), line + 1))
        .collect();

    debug!(rows = records.len(), "parsed excel upload");
    Ok(records)
}

fn excel_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

fn build_record<F>(columns: &ColumnMap, cell: F, line: usize) -> Option<BookRecord>
where
    F: Fn(usize) -> Option<String>,
{
    let text = |i: usize| cell(i).filter(|s| !s.is_empty());

    let (Some(title), Some(author), Some(category)) =
        (text(columns.title), text(columns.author), text(columns.category))
    else {
        debug!(row = line, "dropping row missing title, author or category");
        return None;
    };

    let demand = columns.demand.and_then(&text).and_then(|raw| match raw.parse::<f64>() {
        Ok(d) => Some(d),
        Err(_) => {
            warn!(row = line, value = %raw, "demand is not a number; using default baseline");
            None
        }
    });
    let action = columns.action.and_then(&text).and_then(|raw| raw.parse().ok());

    Some(BookRecord {
        title,
        author,
        category,
        demand,
        action,
    })
}
