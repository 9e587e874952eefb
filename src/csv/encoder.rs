//! Row encoding for a CSV dialect

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Encoder producing rows for [`RowParser`](crate::RowParser) under the
/// same dialect
///
/// Two kinds of field do not read back unchanged: line breaks are dropped
/// when the reader joins physical lines, and leading whitespace is stripped
/// when the dialect skips initial space. [`CsvEncoder::is_lossy`] reports
/// both.
pub struct CsvEncoder {
    delimiter: char,
    quote_char: char,
    double_quote: bool,
    escape_char: Option<char>,
    skip_initial_space: bool,
}

impl CsvEncoder {
    /// Create an encoder for `dialect`
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            delimiter: dialect.delimiter(),
            quote_char: dialect.quote_char(),
            double_quote: dialect.double_quote(),
            escape_char: dialect.escape_char(),
            skip_initial_space: dialect.skip_initial_space(),
        }
    }

    /// Encode entire row into buffer, without a line terminator
    ///
    /// Fails on a row without fields, which would read back as one empty
    /// field, and when a field holds the quote character and the dialect has
    /// neither doubled quotes nor an escape character.
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S], buffer: &mut String) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::WriteError(
                "row has no fields; an empty line reads back as one empty field".to_string(),
            ));
        }
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_field(i, field.as_ref(), buffer)?;
        }
        Ok(())
    }

    /// Check if the parser would read `field` back altered
    pub fn is_lossy(&self, field: &str) -> bool {
        field.contains(['\r', '\n'])
            || (self.skip_initial_space
                && field.starts_with(|c: char| c.is_ascii_whitespace()))
    }

    /// Encode single field with quoting/escaping as needed
    fn encode_field(&self, index: usize, field: &str, buffer: &mut String) -> Result<()> {
        if !self.needs_quoting(field) {
            buffer.push_str(field);
            return Ok(());
        }

        buffer.push(self.quote_char);
        for ch in field.chars() {
            if Some(ch) == self.escape_char {
                buffer.push(ch);
                buffer.push(ch);
            } else if ch == self.quote_char {
                if self.double_quote {
                    buffer.push(ch);
                    buffer.push(ch);
                } else if let Some(escape) = self.escape_char {
                    buffer.push(escape);
                    buffer.push(ch);
                } else {
                    return Err(Error::WriteError(format!(
                        "field {} contains quote character {:?} but the dialect can neither double nor escape it",
                        index, self.quote_char
                    )));
                }
            } else {
                buffer.push(ch);
            }
        }
        buffer.push(self.quote_char);
        Ok(())
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        field.chars().any(|c| {
            c == self.delimiter
                || c == self.quote_char
                || Some(c) == self.escape_char
                || c == '\n'
                || c == '\r'
        })
    }
}
