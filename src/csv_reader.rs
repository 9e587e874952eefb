//! Record reading over a buffered byte source

use crate::csv::RowParser;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::types::{Outcome, Row};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// CSV record reader
///
/// Splits the source into physical lines at the dialect's line terminator,
/// runs each through [`RowParser`] and joins lines that end inside a quoted
/// field. Memory usage is bounded by the longest record.
///
/// The first row is returned like any other; header handling is up to the
/// caller.
///
/// # Examples
///
/// ```
/// use csvdialect::{CsvReader, Dialect};
///
/// let data = "id,name\r\n1,\"Ann\r\nMarie\"\r\n";
/// let mut reader = CsvReader::new(data.as_bytes(), Dialect::default());
///
/// let rows: Vec<_> = reader.rows().collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows, vec![vec!["id", "name"], vec!["1", "AnnMarie"]]);
/// ```
pub struct CsvReader<R> {
    source: R,
    parser: RowParser,
    split_byte: u8,

    // Parser state
    line_buffer: Vec<u8>,
    line_count: u64,
    row_count: u64,
}

impl CsvReader<BufReader<File>> {
    /// Open a CSV file for reading with `dialect`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvdialect::{CsvReader, Dialect};
    ///
    /// let mut reader = CsvReader::open("data.csv", Dialect::default()).unwrap();
    /// while let Some(row) = reader.read_row().unwrap() {
    ///     println!("{:?}", row);
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::ReadError(format!(
                "Failed to open CSV file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self::new(BufReader::new(file), dialect))
    }
}

impl<R: BufRead> CsvReader<R> {
    /// Create a reader over any buffered source
    pub fn new(source: R, dialect: Dialect) -> Self {
        let split_byte = dialect.line_terminator().split_byte();
        Self {
            source,
            parser: RowParser::new(dialect),
            split_byte,
            line_buffer: Vec::with_capacity(1024),
            line_count: 0,
            row_count: 0,
        }
    }

    /// The dialect in use
    pub fn dialect(&self) -> &Dialect {
        self.parser.dialect()
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` at end of input. Input that ends inside a quoted
    /// field is an [`Error::InvalidState`].
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        let mut pending: Option<Outcome> = None;

        loop {
            let Some(line) = self.next_line()? else {
                return match pending {
                    None => Ok(None),
                    Some(_) => Err(Error::InvalidState(format!(
                        "input ended inside a quoted field at line {}",
                        self.line_count
                    ))),
                };
            };

            if pending.is_some() {
                log::debug!("joining line {} to open quoted field", self.line_count);
            }

            let outcome = self
                .parser
                .parse_line(&line, pending.take())
                .map_err(|source| Error::Parse {
                    line: self.line_count,
                    source,
                })?;

            match outcome {
                Outcome::Complete(row) => {
                    self.row_count += 1;
                    return Ok(Some(row));
                }
                partial @ Outcome::Partial(_) => pending = Some(partial),
            }
        }
    }

    /// Get iterator over records
    pub fn rows(&mut self) -> CsvRowIterator<'_, R> {
        CsvRowIterator { reader: self }
    }

    /// Number of physical lines consumed so far
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Number of records returned so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Next physical line including its terminator, `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>> {
        self.line_buffer.clear();
        let bytes_read = self
            .source
            .read_until(self.split_byte, &mut self.line_buffer)
            .map_err(|e| Error::ReadError(format!("Failed to read line: {}", e)))?;

        if bytes_read == 0 {
            return Ok(None);
        }
        self.line_count += 1;

        let line = std::str::from_utf8(&self.line_buffer).map_err(|e| {
            Error::ReadError(format!(
                "Line {} is not valid UTF-8: {}",
                self.line_count, e
            ))
        })?;
        Ok(Some(line.to_owned()))
    }
}

/// Iterator over CSV records
pub struct CsvRowIterator<'a, R> {
    reader: &'a mut CsvReader<R>,
}

impl<'a, R: BufRead> Iterator for CsvRowIterator<'a, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}
