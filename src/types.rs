//! Row and parse outcome types

/// Ordered field values of one record
pub type Row = Vec<String>;

/// Result of parsing one physical line
///
/// A `Partial` outcome means the line ended inside a quoted field. Pass it
/// back to [`RowParser::parse_line`](crate::RowParser::parse_line) together
/// with the next physical line to finish the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Finished record
    Complete(Row),
    /// Record whose last field is still open
    Partial(Row),
}

impl Outcome {
    /// Check if the record is finished
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    /// Check if the record needs another line
    pub fn is_partial(&self) -> bool {
        matches!(self, Outcome::Partial(_))
    }

    /// Fields parsed so far
    pub fn fields(&self) -> &[String] {
        match self {
            Outcome::Complete(row) | Outcome::Partial(row) => row,
        }
    }

    /// Consume the outcome, returning its fields
    pub fn into_fields(self) -> Row {
        match self {
            Outcome::Complete(row) | Outcome::Partial(row) => row,
        }
    }

    /// The finished row, or `None` for a partial outcome
    pub fn into_complete(self) -> Option<Row> {
        match self {
            Outcome::Complete(row) => Some(row),
            Outcome::Partial(_) => None,
        }
    }
}
