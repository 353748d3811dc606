//! Delimited text loading for benchmark reports.
//!
//! The first non-empty line is the header. Header names and cells are
//! trimmed; double-quoted cells may contain the delimiter. Numeric cells that
//! are empty or do not parse are stored as missing values.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{ReportTable, Row};
use crate::error::{CompareError, Result};
use crate::schema::{ColumnRole, Schema, BROWSER_COLUMN, ITERATIONS_COLUMN, PAGE_COLUMN};

impl ReportTable {
    /// Load a report from a delimited text file.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loaded {} bytes from {}", content.len(), path.display());
        Self::from_csv_str(&content, delimiter)
    }

    /// Parse a report from delimited text.
    ///
    /// # Errors
    ///
    /// - [`CompareError::Parse`] for an empty input, a bad field count or an
    ///   unterminated quote
    /// - [`CompareError::MissingColumn`] if `Page`, `Browser` or `Iterations`
    ///   is absent
    /// - any error of [`ReportTable::new`]
    ///
    /// # Example
    ///
    /// ```
    /// use report_compare::table::ReportTable;
    ///
    /// let csv = "Page,Browser,OS,Iterations,Load,Load CI\n\
    ///            Home,Firefox,Linux,30,100,2\n\
    ///            Home,Chrome,Linux,30,120,3\n";
    /// let table = ReportTable::from_csv_str(csv, ',').unwrap();
    /// assert_eq!(table.rows()[1].mean("Load"), Some(120.0));
    /// ```
    pub fn from_csv_str(content: &str, delimiter: char) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_index, header_line) = lines.next().ok_or_else(|| CompareError::Parse {
            line: 1,
            message: "report is empty".to_string(),
        })?;
        let header = split_record(header_line, delimiter).map_err(|message| {
            CompareError::Parse {
                line: header_index + 1,
                message,
            }
        })?;
        let schema = Schema::from_header(header);

        let page_col = schema.require_role(ColumnRole::Page, PAGE_COLUMN)?;
        let browser_col = schema.require_role(ColumnRole::Browser, BROWSER_COLUMN)?;
        let iterations_col = schema.require_role(ColumnRole::Iterations, ITERATIONS_COLUMN)?;
        let os_col = schema.find_role(&ColumnRole::Os);

        let mut rows = Vec::new();
        for (index, line) in lines {
            let line_no = index + 1;
            let fields = split_record(line, delimiter).map_err(|message| CompareError::Parse {
                line: line_no,
                message,
            })?;

            if fields.len() != schema.len() {
                return Err(CompareError::Parse {
                    line: line_no,
                    message: format!("Expected {} columns, got {}", schema.len(), fields.len()),
                });
            }

            let mut row = Row {
                page: fields[page_col].clone(),
                browser: fields[browser_col].clone(),
                os: os_col.map(|c| fields[c].clone()).unwrap_or_default(),
                iterations: parse_count(&fields[iterations_col]),
                values: Default::default(),
            };

            for (column, field) in schema.columns().iter().zip(&fields) {
                if !column.role.is_numeric() {
                    continue;
                }
                if let Ok(value) = field.parse::<f64>() {
                    if value.is_finite() {
                        row.values.insert(column.name.clone(), value);
                    }
                }
            }

            rows.push(row);
        }

        debug!("Parsed {} report rows", rows.len());
        ReportTable::new(schema, rows)
    }
}

/// Sample counts are sometimes written as floats (`30.0`).
fn parse_count(field: &str) -> Option<u32> {
    if let Ok(n) = field.parse::<u32>() {
        return Some(n);
    }
    let value = field.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

fn split_record(line: &str, delimiter: char) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}
