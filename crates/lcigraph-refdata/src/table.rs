//! Minimal reader for delimited text tables
//!
//! Handles quoted fields (`"a;b"`, doubled quotes inside), skips blank lines
//! and `#` comments. The first non-blank line is the header.

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn parse(text: &str, delimiter: char) -> Result<Self> {
        let mut lines = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty() && !l.starts_with('#'));

        let Some(header) = lines.next() else {
            bail!("empty table");
        };
        let header = split_line(header, delimiter);

        let mut rows = Vec::new();
        for (idx, line) in lines.enumerate() {
            let row = split_line(line, delimiter);
            if row.len() != header.len() {
                bail!(
                    "row {} has {} fields, header has {}",
                    idx + 2,
                    row.len(),
                    header.len()
                );
            }
            rows.push(row);
        }
        Ok(Self { header, rows })
    }

    /// Index of the named column, case-insensitive.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Parse a numeric cell, naming the column on failure.
pub fn number(cell: &str, column: &str) -> Result<f64> {
    cell.parse::<f64>()
        .map_err(|e| anyhow::anyhow!("column '{column}': '{cell}' is not a number ({e})"))
}
