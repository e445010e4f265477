//! Struct frame: the `(tag, field count)` header preceding every struct.

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};

/// Struct tag bytes.
pub mod tag {
    pub const NODE: u8 = b'N';
    pub const RELATIONSHIP: u8 = b'R';
    pub const UNBOUND_RELATIONSHIP: u8 = b'r';
    pub const PATH: u8 = b'P';
    pub const DATE: u8 = b'D';
    pub const TIME: u8 = b'T';
    pub const LOCAL_TIME: u8 = b't';
    pub const LOCAL_DATE_TIME: u8 = b'd';
    /// Offset date-time with UTC epoch seconds.
    pub const DATE_TIME: u8 = b'I';
    /// Zoned date-time with UTC epoch seconds.
    pub const DATE_TIME_ZONE_ID: u8 = b'i';
    /// Offset date-time with local wall-clock epoch seconds.
    pub const LEGACY_DATE_TIME: u8 = b'F';
    /// Zoned date-time with local wall-clock epoch seconds.
    pub const LEGACY_DATE_TIME_ZONE_ID: u8 = b'f';
    pub const DURATION: u8 = b'E';
    pub const POINT_2D: u8 = b'X';
    pub const POINT_3D: u8 = b'Y';
}

/// Header of a tagged struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructHeader {
    pub tag: u8,
    pub length: u16,
}

impl StructHeader {
    pub fn new(tag: u8, length: u16) -> Self {
        Self { tag, length }
    }

    /// Fails with `StructSize` unless the header declares exactly `expected` fields.
    pub fn expect_length(&self, expected: u16) -> Result<(), DecodeError> {
        if self.length != expected {
            return Err(DecodeError::StructSize {
                tag: self.tag,
                expected,
                actual: self.length,
            });
        }
        Ok(())
    }
}

/// Reads a struct header. Performs no validation of the length.
pub fn read_header(reader: &mut Reader<'_>) -> Result<StructHeader, DecodeError> {
    let length = reader.read_struct_length("struct header")?;
    let tag = reader.read_byte("struct tag")?;
    Ok(StructHeader { tag, length })
}

/// Writes a struct header.
pub fn write_header(writer: &mut Writer, tag: u8, length: u16) -> Result<(), EncodeError> {
    writer.write_struct_length(length)?;
    writer.write_byte(tag);
    Ok(())
}
