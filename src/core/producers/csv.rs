//! Minimal CSV row writer for staging files

use crate::domain::{DumpError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Quote a field if it contains a delimiter, quote or line break
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Buffered writer of one CSV file with a header row
pub struct CsvWriter {
    out: BufWriter<File>,
    path: PathBuf,
    columns: usize,
    rows: u64,
}

impl CsvWriter {
    /// Create (or truncate) `path` and write the header row
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Production`] if the file cannot be created.
    pub fn create(path: &Path, header: &[&str]) -> Result<Self> {
        let file = File::create(path).map_err(|e| production_err(path, e))?;
        let mut writer = Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            columns: header.len(),
            rows: 0,
        };
        writer.write_line(header)?;
        Ok(writer)
    }

    /// Append one data row
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Production`] if the row has the wrong number of
    /// fields or cannot be written.
    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        if fields.len() != self.columns {
            return Err(DumpError::Production(format!(
                "row has {} fields, header has {}",
                fields.len(),
                self.columns
            )));
        }
        self.write_line(fields)?;
        self.rows += 1;
        Ok(())
    }

    fn write_line<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        let line = fields
            .iter()
            .map(|f| quote_field(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.out, "{line}").map_err(|e| production_err(&self.path, e))
    }

    /// Flush the file and return the number of data rows written
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().map_err(|e| production_err(&self.path, e))?;
        Ok(self.rows)
    }
}

fn production_err(path: &Path, e: std::io::Error) -> DumpError {
    DumpError::Production(format!("failed to write {}: {e}", path.display()))
}
