//! Append-only CSV run logs
//!
//! Each pass records what it deleted, created or modified in a file named
//! after the scenario and the run date, e.g.
//! `log created fuel markets REMIND SSP2-Base 2030-2024-05-01.csv`.

use crate::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for a run log of the given kind.
pub fn log_file_name(kind: &str, model: &str, pathway: &str, year: i32) -> String {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d");
    format!(
        "log {kind} {} {pathway} {year}-{today}.csv",
        model.to_uppercase()
    )
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append rows to `file_name`, creating the directory and file if needed.
    pub fn append_rows<R, S>(&self, file_name: &str, rows: R, delimiter: char) -> Result<PathBuf>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut buf = String::new();
        for row in rows {
            push_row(&mut buf, row, delimiter);
        }
        file.write_all(buf.as_bytes())?;
        Ok(path)
    }

    /// Append rows to `file_name`, writing `header` first only when the file
    /// is new or empty. Earlier runs' rows are kept.
    pub fn append_table<R, S>(
        &self,
        file_name: &str,
        header: &[&str],
        rows: R,
        delimiter: char,
    ) -> Result<PathBuf>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut buf = String::new();
        if file.metadata()?.len() == 0 {
            push_row(&mut buf, header.iter(), delimiter);
        }
        for row in rows {
            push_row(&mut buf, row, delimiter);
        }
        file.write_all(buf.as_bytes())?;
        Ok(path)
    }

    /// Write a fresh table with a header line, replacing any previous file.
    pub fn write_table<R, S>(
        &self,
        file_name: &str,
        header: &[&str],
        rows: R,
        delimiter: char,
    ) -> Result<PathBuf>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let mut buf = String::new();
        push_row(&mut buf, header.iter(), delimiter);
        for row in rows {
            push_row(&mut buf, row, delimiter);
        }
        std::fs::write(&path, buf)?;
        Ok(path)
    }
}

fn push_row<I, S>(buf: &mut String, row: I, delimiter: char)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in row.into_iter().enumerate() {
        if i > 0 {
            buf.push(delimiter);
        }
        push_field(buf, field.as_ref(), delimiter);
    }
    buf.push('\n');
}

fn push_field(buf: &mut String, field: &str, delimiter: char) {
    let needs_quotes = field.contains(delimiter) || field.contains('"') || field.contains('\n');
    if needs_quotes {
        buf.push('"');
        buf.push_str(&field.replace('"', "\"\""));
        buf.push('"');
    } else {
        buf.push_str(field);
    }
}
