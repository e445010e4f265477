//! Error types for struct encoding and decoding.

use thiserror::Error;

/// Broad classification of a decode failure.
///
/// The connection layer uses this to decide how to report the failure; the
/// codec itself never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Truncated input, unexpected marker, bad UTF-8 or exceeded limit.
    Malformed,
    /// Struct field count does not match the arity of its tag.
    StructSize,
    /// A well-typed field carries a semantically invalid value.
    StructArgument,
    /// No decoder is registered for the struct tag.
    Dispatch,
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("unexpected marker 0x{marker:02X} while reading {context}")]
    UnexpectedMarker { context: &'static str, marker: u8 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("value nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    #[error("{count} trailing bytes after value")]
    TrailingBytes { count: usize },

    #[error("struct 0x{tag:02X} has {actual} fields, expected {expected}")]
    StructSize { tag: u8, expected: u16, actual: u16 },

    #[error("illegal value for field \"{field}\": {reason}")]
    StructArgument { field: &'static str, reason: String },

    #[error("no struct registered for tag 0x{tag:02X}")]
    UnknownStruct { tag: u8 },
}

impl DecodeError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::StructSize { .. } => ErrorKind::StructSize,
            DecodeError::StructArgument { .. } => ErrorKind::StructArgument,
            DecodeError::UnknownStruct { .. } => ErrorKind::Dispatch,
            _ => ErrorKind::Malformed,
        }
    }

    pub(crate) fn argument(field: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::StructArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("illegal value for field \"{field}\": {reason}")]
    StructArgument { field: &'static str, reason: String },

    #[error("value nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },
}

impl EncodeError {
    pub(crate) fn argument(field: &'static str, reason: impl Into<String>) -> Self {
        EncodeError::StructArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Error when constructing a model value from raw parts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("unknown coordinate reference system code {code}")]
    UnknownCrs { code: i32 },

    #[error("{crs} requires {expected} coordinates, got {actual}")]
    DimensionMismatch {
        crs: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("coordinate is NaN")]
    CoordinateIsNan,

    #[error("{crs} longitude {lon} out of range [-180, +180]")]
    LongitudeOutOfRange { crs: &'static str, lon: f64 },

    #[error("{crs} latitude {lat} out of range [-90, +90]")]
    LatitudeOutOfRange { crs: &'static str, lat: f64 },
}
