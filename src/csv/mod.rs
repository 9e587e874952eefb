//! Row parsing and encoding for a CSV dialect

mod encoder;
mod parser;

pub use encoder::CsvEncoder;
pub use parser::RowParser;
