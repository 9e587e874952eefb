//! Record writing for a CSV dialect

use crate::csv::CsvEncoder;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV record writer
///
/// Encodes rows with [`CsvEncoder`] and terminates each with the dialect's
/// line terminator.
///
/// Fields containing line breaks are written inside quotes, but
/// [`CsvReader`](crate::CsvReader) drops the break when it joins the
/// physical lines back together. Leading whitespace is stripped on read when
/// the dialect skips initial space. The writer logs a warning for such rows.
///
/// # Examples
///
/// ```
/// use csvdialect::{CsvWriter, Dialect};
///
/// let mut writer = CsvWriter::new(Vec::new(), Dialect::default());
/// writer.write_row(["Name", "Note"]).unwrap();
/// writer.write_row(["Alice", "likes, commas"]).unwrap();
/// let bytes = writer.into_inner().unwrap();
/// assert_eq!(bytes, b"Name,Note\r\nAlice,\"likes, commas\"\r\n");
/// ```
pub struct CsvWriter<W: Write> {
    sink: W,
    encoder: CsvEncoder,
    line_ending: &'static str,

    // State
    row_count: u64,
    buffer: String,
}

impl CsvWriter<BufWriter<File>> {
    /// Create (or truncate) a CSV file for writing with `dialect`
    pub fn create<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| {
            Error::WriteError(format!(
                "Failed to create CSV file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self::new(BufWriter::new(file), dialect))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer over any byte sink
    pub fn new(sink: W, dialect: Dialect) -> Self {
        Self {
            sink,
            encoder: CsvEncoder::new(&dialect),
            line_ending: dialect.line_terminator().as_str(),
            row_count: 0,
            buffer: String::with_capacity(1024),
        }
    }

    /// Write a single row
    pub fn write_row<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = fields.into_iter().collect();
        if let Some(i) = fields.iter().position(|f| self.encoder.is_lossy(f.as_ref())) {
            log::warn!(
                "row {} field {} has a line break or leading whitespace; it will not survive a read back",
                self.row_count + 1,
                i
            );
        }

        self.buffer.clear();
        self.encoder.encode_row(&fields, &mut self.buffer)?;
        self.buffer.push_str(self.line_ending);

        self.sink
            .write_all(self.buffer.as_bytes())
            .map_err(|e| Error::WriteError(format!("Failed to write row: {}", e)))?;
        self.row_count += 1;
        Ok(())
    }

    /// Get the number of rows written so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Flush buffered output
    pub fn save(&mut self) -> Result<()> {
        self.sink
            .flush()
            .map_err(|e| Error::WriteError(format!("Failed to flush: {}", e)))
    }

    /// Flush and return the underlying sink
    pub fn into_inner(mut self) -> Result<W> {
        self.save()?;
        Ok(self.sink)
    }
}
