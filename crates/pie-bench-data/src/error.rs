//! Structural errors raised while decoding benchmark result records.

use std::fmt;

/// What is wrong with the offending part of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The top-level document is not an array of records.
    NotASequence,
    /// A record is not a JSON object.
    NotAnObject,
    /// A required field is absent.
    MissingField,
    /// A parameter is named like one of the table's fixed columns.
    ReservedName,
    /// A field holds a value of the wrong JSON type.
    InvalidType {
        /// Human-readable description of the accepted type.
        expected: &'static str,
    },
}

/// A malformed-input fault, carrying the record index and field path needed
/// to locate the problem in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    record: Option<usize>,
    field: Option<String>,
    kind: ParseErrorKind,
}

impl ParseError {
    /// The document itself is not a sequence of records.
    pub fn not_a_sequence() -> Self {
        Self {
            record: None,
            field: None,
            kind: ParseErrorKind::NotASequence,
        }
    }

    /// Record `record` is not an object.
    pub fn not_an_object(record: usize) -> Self {
        Self {
            record: Some(record),
            field: None,
            kind: ParseErrorKind::NotAnObject,
        }
    }

    /// Record `record` lacks `field`.
    pub fn missing_field(record: usize, field: impl Into<String>) -> Self {
        Self {
            record: Some(record),
            field: Some(field.into()),
            kind: ParseErrorKind::MissingField,
        }
    }

    /// Parameter `field` of record `record` collides with a fixed column.
    pub fn reserved_name(record: usize, field: impl Into<String>) -> Self {
        Self {
            record: Some(record),
            field: Some(field.into()),
            kind: ParseErrorKind::ReservedName,
        }
    }

    /// `field` of record `record` does not have the `expected` JSON type.
    pub fn invalid_type(record: usize, field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            record: Some(record),
            field: Some(field.into()),
            kind: ParseErrorKind::InvalidType { expected },
        }
    }

    /// Index of the offending record, if the fault is record-level.
    pub fn record(&self) -> Option<usize> {
        self.record
    }

    /// Dotted path of the offending field (e.g. `secondaryMetrics.c1:time.score`).
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The kind of fault.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(record) = self.record {
            write!(f, "record {record}: ")?;
        }
        let field = self.field.as_deref().unwrap_or("");
        match self.kind {
            ParseErrorKind::NotASequence => {
                write!(f, "input is not an array of benchmark records")
            }
            ParseErrorKind::NotAnObject => write!(f, "expected a JSON object"),
            ParseErrorKind::MissingField => write!(f, "missing field '{field}'"),
            ParseErrorKind::ReservedName => {
                write!(f, "field '{field}' collides with a fixed column name")
            }
            ParseErrorKind::InvalidType { expected } => {
                write!(f, "field '{field}' has invalid type (expected {expected})")
            }
        }
    }
}

impl std::error::Error for ParseError {}
