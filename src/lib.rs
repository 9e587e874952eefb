//! # csvdialect
//!
//! Dialect-aware CSV row parsing, approximating RFC 4180 with the options of
//! a CSVDDF dialect description.
//!
//! The core is [`RowParser`], which turns one physical line into a list of
//! fields. A quoted field left open at the end of a line produces an
//! [`Outcome::Partial`]; hand it back together with the next line to finish
//! the record. [`CsvReader`] does that loop over any `BufRead`, and
//! [`CsvWriter`] writes rows in the same dialect. Line breaks inside fields,
//! and leading whitespace under `skip_initial_space`, do not survive the
//! trip back through the parser.
//!
//! ```
//! use csvdialect::{Dialect, DialectOptions, Outcome, RowParser};
//!
//! let dialect = Dialect::new(DialectOptions::new().escape_char('\\')).unwrap();
//! let parser = RowParser::new(dialect);
//!
//! assert_eq!(
//!     parser.parse("a,b\\,c").unwrap(),
//!     Outcome::Complete(vec!["a".into(), "b,c".into()])
//! );
//! ```
//!
//! ## Features
//!
//! - `serde`: deserialize [`DialectOptions`] from a CSVDDF JSON description
//! - `parallel`: [`RowParser::parse_lines_par`] via rayon

pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod dialect;
pub mod error;
pub mod types;

pub use csv::{CsvEncoder, RowParser};
pub use csv_reader::{CsvReader, CsvRowIterator};
pub use csv_writer::CsvWriter;
pub use dialect::{Dialect, DialectOptions, LineTerminator};
pub use error::{ConfigError, Error, ParseError, ParseErrorKind, Result};
pub use types::{Outcome, Row};
