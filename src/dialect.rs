//! CSV dialect configuration
//!
//! A [`Dialect`] is built once from a partial [`DialectOptions`] set, the
//! supplied values overlaid on the CSVDDF defaults, and is immutable from
//! then on.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Line terminator accepted by a dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineTerminator {
    /// `\r\n`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "\r\n"))]
    Crlf,
    /// `\n\r`
    #[cfg_attr(feature = "serde", serde(rename = "\n\r"))]
    Lfcr,
    /// `\n`
    #[cfg_attr(feature = "serde", serde(rename = "\n"))]
    Lf,
    /// `\r`
    #[cfg_attr(feature = "serde", serde(rename = "\r"))]
    Cr,
}

impl LineTerminator {
    /// The terminator as text
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Crlf => "\r\n",
            LineTerminator::Lfcr => "\n\r",
            LineTerminator::Lf => "\n",
            LineTerminator::Cr => "\r",
        }
    }

    /// Last byte of the sequence, where a byte stream is split into lines
    pub fn split_byte(&self) -> u8 {
        match self {
            LineTerminator::Crlf | LineTerminator::Lf => b'\n',
            LineTerminator::Lfcr | LineTerminator::Cr => b'\r',
        }
    }
}

impl FromStr for LineTerminator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\r\n" => Ok(LineTerminator::Crlf),
            "\n\r" => Ok(LineTerminator::Lfcr),
            "\n" => Ok(LineTerminator::Lf),
            "\r" => Ok(LineTerminator::Cr),
            other => Err(ConfigError::UnsupportedLineTerminator(other.to_string())),
        }
    }
}

impl fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Partial set of dialect options
///
/// Every option is optional; anything left unset keeps its default when the
/// options are turned into a [`Dialect`]. With the `serde` feature the
/// options deserialize from a CSVDDF dialect description
/// (`{"delimiter": ";", "doubleQuote": false, ...}`).
///
/// # Examples
///
/// ```
/// use csvdialect::{Dialect, DialectOptions};
///
/// let dialect = Dialect::new(
///     DialectOptions::new()
///         .delimiter(";")
///         .escape_char('\\')
///         .double_quote(false),
/// )
/// .unwrap();
/// assert_eq!(dialect.delimiter(), ';');
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct DialectOptions {
    pub delimiter: Option<String>,
    pub line_terminator: Option<String>,
    pub quote_char: Option<char>,
    pub double_quote: Option<bool>,
    pub escape_char: Option<char>,
    pub null_sequence: Option<String>,
    pub skip_initial_space: Option<bool>,
    pub header: Option<bool>,
    pub case_sensitive_header: Option<bool>,
    pub csvddf_version: Option<String>,
}

impl DialectOptions {
    /// Empty option set (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the line terminator (builder pattern)
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = Some(terminator.into());
        self
    }

    /// Set the quote character (builder pattern)
    pub fn quote_char(mut self, quote: char) -> Self {
        self.quote_char = Some(quote);
        self
    }

    /// Enable or disable doubled-quote escaping (builder pattern)
    pub fn double_quote(mut self, enabled: bool) -> Self {
        self.double_quote = Some(enabled);
        self
    }

    /// Set the escape character (builder pattern)
    pub fn escape_char(mut self, escape: char) -> Self {
        self.escape_char = Some(escape);
        self
    }

    /// Set a null sequence; always rejected by [`Dialect::new`]
    pub fn null_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.null_sequence = Some(sequence.into());
        self
    }

    /// Enable or disable stripping of leading whitespace (builder pattern)
    pub fn skip_initial_space(mut self, enabled: bool) -> Self {
        self.skip_initial_space = Some(enabled);
        self
    }

    /// Whether the source carries a header row (builder pattern)
    pub fn header(mut self, header: bool) -> Self {
        self.header = Some(header);
        self
    }

    /// Whether header names are case sensitive (builder pattern)
    pub fn case_sensitive_header(mut self, enabled: bool) -> Self {
        self.case_sensitive_header = Some(enabled);
        self
    }

    /// CSVDDF version the description follows (builder pattern)
    pub fn csvddf_version(mut self, version: impl Into<String>) -> Self {
        self.csvddf_version = Some(version.into());
        self
    }
}

/// Resolved, validated CSV dialect
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Dialect {
    delimiter: char,
    line_terminator: LineTerminator,
    quote_char: char,
    double_quote: bool,
    escape_char: Option<char>,
    skip_initial_space: bool,
    header: bool,
    case_sensitive_header: bool,
    csvddf_version: Option<String>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            line_terminator: LineTerminator::Crlf,
            quote_char: '"',
            double_quote: true,
            escape_char: None,
            skip_initial_space: true,
            header: true,
            case_sensitive_header: false,
            csvddf_version: None,
        }
    }
}

impl Dialect {
    /// Build a dialect from `options` overlaid on the defaults
    ///
    /// Fails when the line terminator is not one of the four RFC4180
    /// variants, when the delimiter is not a single character, or when a
    /// null sequence is supplied.
    pub fn new(options: DialectOptions) -> Result<Self, ConfigError> {
        if options.null_sequence.is_some() {
            return Err(ConfigError::NullSequenceUnsupported);
        }

        let defaults = Self::default();

        let line_terminator = match options.line_terminator {
            Some(ref terminator) => terminator.parse()?,
            None => defaults.line_terminator,
        };

        let delimiter = match options.delimiter {
            Some(ref delimiter) => single_char(delimiter)
                .ok_or_else(|| ConfigError::InvalidDelimiter(delimiter.clone()))?,
            None => defaults.delimiter,
        };

        let dialect = Self {
            delimiter,
            line_terminator,
            quote_char: options.quote_char.unwrap_or(defaults.quote_char),
            double_quote: options.double_quote.unwrap_or(defaults.double_quote),
            escape_char: options.escape_char.or(defaults.escape_char),
            skip_initial_space: options
                .skip_initial_space
                .unwrap_or(defaults.skip_initial_space),
            header: options.header.unwrap_or(defaults.header),
            case_sensitive_header: options
                .case_sensitive_header
                .unwrap_or(defaults.case_sensitive_header),
            csvddf_version: options.csvddf_version.or(defaults.csvddf_version),
        };

        log::debug!(
            "built dialect: delimiter={:?} terminator={} quote={:?} double_quote={} escape={:?} skip_initial_space={}",
            dialect.delimiter,
            dialect.line_terminator,
            dialect.quote_char,
            dialect.double_quote,
            dialect.escape_char,
            dialect.skip_initial_space,
        );

        Ok(dialect)
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn line_terminator(&self) -> LineTerminator {
        self.line_terminator
    }

    pub fn quote_char(&self) -> char {
        self.quote_char
    }

    pub fn double_quote(&self) -> bool {
        self.double_quote
    }

    pub fn escape_char(&self) -> Option<char> {
        self.escape_char
    }

    pub fn skip_initial_space(&self) -> bool {
        self.skip_initial_space
    }

    /// Informational; the parser does not treat the first row specially
    pub fn header(&self) -> bool {
        self.header
    }

    /// Informational
    pub fn case_sensitive_header(&self) -> bool {
        self.case_sensitive_header
    }

    /// Informational
    pub fn csvddf_version(&self) -> Option<&str> {
        self.csvddf_version.as_deref()
    }
}

impl TryFrom<DialectOptions> for Dialect {
    type Error = ConfigError;

    fn try_from(options: DialectOptions) -> Result<Self, Self::Error> {
        Dialect::new(options)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
