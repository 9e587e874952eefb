//! Error types for dialect construction, row parsing and record I/O

use thiserror::Error;

/// Result type for reader and writer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid dialect option, raised while building a [`Dialect`](crate::Dialect)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Line terminator is not one of CRLF, LFCR, LF or CR
    #[error("unsupported line terminator {0:?}, expected one of \"\\r\\n\", \"\\n\\r\", \"\\n\", \"\\r\"")]
    UnsupportedLineTerminator(String),

    /// Delimiter is not exactly one character long
    #[error("delimiter must be exactly one character, got {0:?}")]
    InvalidDelimiter(String),

    /// A null sequence was supplied
    #[error("nullSequence is not supported")]
    NullSequenceUnsupported,
}

/// Category of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The line content itself is malformed
    DataSource,
    /// The input breaks a structural rule of the dialect or of the parser API
    Validation,
}

/// Error detected while parsing a single line
///
/// Parse errors never affect the dialect or the parser; the caller may
/// skip the offending line and carry on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Escape character is the last character of the line
    #[error("escape character {escape:?} at end of line (column {column})")]
    DanglingEscape {
        /// The configured escape character
        escape: char,
        /// 0-based character column of the escape character
        column: usize,
    },

    /// Quote character inside a field that was not opened with a quote
    #[error("quote character {quote:?} inside unenclosed field {field} (column {column})")]
    UnexpectedQuote {
        /// The configured quote character
        quote: char,
        /// 0-based index of the field being read
        field: usize,
        /// 0-based character column of the quote
        column: usize,
    },

    /// Continuation handed to the parser is not a partial outcome
    #[error("continuation is not a partial row")]
    MissingContinuation,
}

impl ParseError {
    /// Whether this is a data-source or a validation failure
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::DanglingEscape { .. } => ParseErrorKind::DataSource,
            ParseError::UnexpectedQuote { .. } | ParseError::MissingContinuation => {
                ParseErrorKind::Validation
            }
        }
    }
}

/// Errors raised by the record reader and writer
#[derive(Debug, Error)]
pub enum Error {
    /// Dialect construction failed
    #[error("Dialect error: {0}")]
    Config(#[from] ConfigError),

    /// A physical line could not be parsed
    #[error("Parse error on line {line}: {source}")]
    Parse {
        /// 1-based physical line number
        line: u64,
        /// Underlying parse failure
        #[source]
        source: ParseError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be read as text
    #[error("Read error: {0}")]
    ReadError(String),

    /// Row could not be encoded
    #[error("Write error: {0}")]
    WriteError(String),

    /// Input ended or was used in an unexpected state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
