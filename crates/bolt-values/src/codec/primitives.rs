//! PackStream primitive encoding/decoding.
//!
//! Implements the marker-prefixed scalar, string, bytes, list and map
//! encodings that every struct field is built from. All multi-byte
//! numbers are big-endian.

use crate::error::{DecodeError, EncodeError};

pub(crate) const TINY_STRING: u8 = 0x80;
pub(crate) const TINY_LIST: u8 = 0x90;
pub(crate) const TINY_MAP: u8 = 0xA0;
pub(crate) const TINY_STRUCT: u8 = 0xB0;
pub(crate) const NULL: u8 = 0xC0;
pub(crate) const FLOAT_64: u8 = 0xC1;
pub(crate) const FALSE: u8 = 0xC2;
pub(crate) const TRUE: u8 = 0xC3;
pub(crate) const INT_8: u8 = 0xC8;
pub(crate) const INT_16: u8 = 0xC9;
pub(crate) const INT_32: u8 = 0xCA;
pub(crate) const INT_64: u8 = 0xCB;
pub(crate) const BYTES_8: u8 = 0xCC;
pub(crate) const BYTES_16: u8 = 0xCD;
pub(crate) const BYTES_32: u8 = 0xCE;
pub(crate) const STRING_8: u8 = 0xD0;
pub(crate) const STRING_16: u8 = 0xD1;
pub(crate) const STRING_32: u8 = 0xD2;
pub(crate) const LIST_8: u8 = 0xD4;
pub(crate) const LIST_16: u8 = 0xD5;
pub(crate) const LIST_32: u8 = 0xD6;
pub(crate) const MAP_8: u8 = 0xD8;
pub(crate) const MAP_16: u8 = 0xD9;
pub(crate) const MAP_32: u8 = 0xDA;
pub(crate) const STRUCT_8: u8 = 0xDC;
pub(crate) const STRUCT_16: u8 = 0xDD;

const TINY_INT_MIN: i64 = -16;
const TINY_INT_MAX: i64 = 127;

/// Marker families with a 4-bit inline length and 8/16/32-bit prefixed forms.
#[derive(Debug, Clone, Copy)]
struct SizedMarkers {
    tiny: u8,
    len8: u8,
    len16: u8,
    len32: Option<u8>,
}

const STRING_MARKERS: SizedMarkers = SizedMarkers {
    tiny: TINY_STRING,
    len8: STRING_8,
    len16: STRING_16,
    len32: Some(STRING_32),
};

const LIST_MARKERS: SizedMarkers = SizedMarkers {
    tiny: TINY_LIST,
    len8: LIST_8,
    len16: LIST_16,
    len32: Some(LIST_32),
};

const MAP_MARKERS: SizedMarkers = SizedMarkers {
    tiny: TINY_MAP,
    len8: MAP_8,
    len16: MAP_16,
    len32: Some(MAP_32),
};

const STRUCT_MARKERS: SizedMarkers = SizedMarkers {
    tiny: TINY_STRUCT,
    len8: STRUCT_8,
    len16: STRUCT_16,
    len32: None,
};

/// Coarse type of the next value, derived from its marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerType {
    Null,
    Boolean,
    Integer,
    Float,
    Bytes,
    String,
    List,
    Map,
    Struct,
    Reserved,
}

impl MarkerType {
    /// Classifies a marker byte.
    pub fn of(marker: u8) -> MarkerType {
        match marker {
            0x00..=0x7F | 0xF0..=0xFF => MarkerType::Integer,
            INT_8 | INT_16 | INT_32 | INT_64 => MarkerType::Integer,
            0x80..=0x8F | STRING_8 | STRING_16 | STRING_32 => MarkerType::String,
            0x90..=0x9F | LIST_8 | LIST_16 | LIST_32 => MarkerType::List,
            0xA0..=0xAF | MAP_8 | MAP_16 | MAP_32 => MarkerType::Map,
            0xB0..=0xBF | STRUCT_8 | STRUCT_16 => MarkerType::Struct,
            NULL => MarkerType::Null,
            FLOAT_64 => MarkerType::Float,
            FALSE | TRUE => MarkerType::Boolean,
            BYTES_8 | BYTES_16 | BYTES_32 => MarkerType::Bytes,
            _ => MarkerType::Reserved,
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding PackStream data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = self.peek_byte(context)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self, context: &'static str) -> Result<u8, DecodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof { context })
    }

    /// Returns the coarse type of the next value without consuming it.
    pub fn peek_type(&self, context: &'static str) -> Result<MarkerType, DecodeError> {
        self.peek_byte(context).map(MarkerType::of)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    fn read_u8(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        Ok(self.read_byte(context)? as usize)
    }

    fn read_u16(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        Ok(u16::from_be_bytes(self.read_array(context)?) as usize)
    }

    fn read_u32(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        Ok(u32::from_be_bytes(self.read_array(context)?) as usize)
    }

    /// Reads a null marker.
    pub fn read_null(&mut self, context: &'static str) -> Result<(), DecodeError> {
        match self.read_byte(context)? {
            NULL => Ok(()),
            marker => Err(DecodeError::UnexpectedMarker { context, marker }),
        }
    }

    /// Reads a boolean.
    pub fn read_bool(&mut self, context: &'static str) -> Result<bool, DecodeError> {
        match self.read_byte(context)? {
            FALSE => Ok(false),
            TRUE => Ok(true),
            marker => Err(DecodeError::UnexpectedMarker { context, marker }),
        }
    }

    /// Reads an integer in any of its encoded widths.
    pub fn read_int(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        let marker = self.read_byte(context)?;
        match marker {
            0x00..=0x7F | 0xF0..=0xFF => Ok(marker as i8 as i64),
            INT_8 => Ok(i8::from_be_bytes(self.read_array(context)?) as i64),
            INT_16 => Ok(i16::from_be_bytes(self.read_array(context)?) as i64),
            INT_32 => Ok(i32::from_be_bytes(self.read_array(context)?) as i64),
            INT_64 => Ok(i64::from_be_bytes(self.read_array(context)?)),
            _ => Err(DecodeError::UnexpectedMarker { context, marker }),
        }
    }

    /// Reads a 64-bit float.
    pub fn read_float(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        match self.read_byte(context)? {
            FLOAT_64 => Ok(f64::from_be_bytes(self.read_array(context)?)),
            marker => Err(DecodeError::UnexpectedMarker { context, marker }),
        }
    }

    /// Reads the length prefix of a sized marker family.
    fn read_sized(
        &mut self,
        markers: SizedMarkers,
        max_len: usize,
        field: &'static str,
    ) -> Result<usize, DecodeError> {
        let marker = self.read_byte(field)?;
        let len = if marker & 0xF0 == markers.tiny {
            (marker & 0x0F) as usize
        } else if marker == markers.len8 {
            self.read_u8(field)?
        } else if marker == markers.len16 {
            self.read_u16(field)?
        } else if Some(marker) == markers.len32 {
            self.read_u32(field)?
        } else {
            return Err(DecodeError::UnexpectedMarker {
                context: field,
                marker,
            });
        };
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        Ok(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self, max_len: usize, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_sized(STRING_MARKERS, max_len, field)?;
        let bytes = self.read_bytes(len, field)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Reads a length-prefixed byte array.
    pub fn read_byte_array(&mut self, max_len: usize, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let marker = self.read_byte(field)?;
        let len = match marker {
            BYTES_8 => self.read_u8(field)?,
            BYTES_16 => self.read_u16(field)?,
            BYTES_32 => self.read_u32(field)?,
            _ => return Err(DecodeError::UnexpectedMarker { context: field, marker }),
        };
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        Ok(self.read_bytes(len, field)?.to_vec())
    }

    /// Reads a list header, returning the element count.
    pub fn read_list_header(&mut self, max_len: usize, field: &'static str) -> Result<usize, DecodeError> {
        self.read_sized(LIST_MARKERS, max_len, field)
    }

    /// Reads a map header, returning the entry count.
    pub fn read_map_header(&mut self, max_len: usize, field: &'static str) -> Result<usize, DecodeError> {
        self.read_sized(MAP_MARKERS, max_len, field)
    }

    /// Reads a struct marker, returning the field count.
    pub fn read_struct_length(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        let len = self.read_sized(STRUCT_MARKERS, u16::MAX as usize, context)?;
        // STRUCT_16 caps the length at u16::MAX
        Ok(len as u16)
    }

    /// Returns a capacity hint for `count` elements that cannot exceed the
    /// remaining input, since every encoded element takes at least one byte.
    pub fn capacity_hint(&self, count: usize) -> usize {
        count.min(self.remaining_len())
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding PackStream data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a null marker.
    pub fn write_null(&mut self) {
        self.buf.push(NULL);
    }

    /// Writes a boolean.
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(if value { TRUE } else { FALSE });
    }

    /// Writes an integer using the smallest encoding that holds it.
    pub fn write_int(&mut self, value: i64) {
        if (TINY_INT_MIN..=TINY_INT_MAX).contains(&value) {
            self.buf.push(value as i8 as u8);
        } else if let Ok(v) = i8::try_from(value) {
            self.buf.push(INT_8);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else if let Ok(v) = i16::try_from(value) {
            self.buf.push(INT_16);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else if let Ok(v) = i32::try_from(value) {
            self.buf.push(INT_32);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else {
            self.buf.push(INT_64);
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
    }

    /// Writes a 64-bit float.
    pub fn write_float(&mut self, value: f64) {
        self.buf.push(FLOAT_64);
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn write_sized(
        &mut self,
        markers: SizedMarkers,
        len: usize,
        field: &'static str,
    ) -> Result<(), EncodeError> {
        if len < 0x10 {
            self.buf.push(markers.tiny | len as u8);
        } else if let Ok(l) = u8::try_from(len) {
            self.buf.push(markers.len8);
            self.buf.push(l);
        } else if let Ok(l) = u16::try_from(len) {
            self.buf.push(markers.len16);
            self.buf.extend_from_slice(&l.to_be_bytes());
        } else {
            match (markers.len32, u32::try_from(len)) {
                (Some(marker), Ok(l)) => {
                    self.buf.push(marker);
                    self.buf.extend_from_slice(&l.to_be_bytes());
                }
                (Some(_), Err(_)) => {
                    return Err(EncodeError::LengthExceedsLimit {
                        field,
                        len,
                        max: u32::MAX as usize,
                    });
                }
                (None, _) => {
                    return Err(EncodeError::LengthExceedsLimit {
                        field,
                        len,
                        max: u16::MAX as usize,
                    });
                }
            }
        }
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_sized(STRING_MARKERS, s.len(), "string")?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// Writes a length-prefixed byte array.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let len = bytes.len();
        if let Ok(l) = u8::try_from(len) {
            self.buf.push(BYTES_8);
            self.buf.push(l);
        } else if let Ok(l) = u16::try_from(len) {
            self.buf.push(BYTES_16);
            self.buf.extend_from_slice(&l.to_be_bytes());
        } else if let Ok(l) = u32::try_from(len) {
            self.buf.push(BYTES_32);
            self.buf.extend_from_slice(&l.to_be_bytes());
        } else {
            return Err(EncodeError::LengthExceedsLimit {
                field: "bytes",
                len,
                max: u32::MAX as usize,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a list header for `len` elements.
    pub fn write_list_header(&mut self, len: usize) -> Result<(), EncodeError> {
        self.write_sized(LIST_MARKERS, len, "list")
    }

    /// Writes a map header for `len` entries.
    pub fn write_map_header(&mut self, len: usize) -> Result<(), EncodeError> {
        self.write_sized(MAP_MARKERS, len, "map")
    }

    /// Writes a struct marker for `len` fields.
    pub fn write_struct_length(&mut self, len: u16) -> Result<(), EncodeError> {
        self.write_sized(STRUCT_MARKERS, len as usize, "struct")
    }

    /// Writes a list of strings.
    pub fn write_string_list<S: AsRef<str>>(&mut self, items: &[S]) -> Result<(), EncodeError> {
        self.write_list_header(items.len())?;
        for item in items {
            self.write_string(item.as_ref())?;
        }
        Ok(())
    }

    /// Writes a list of integers.
    pub fn write_int_list(&mut self, items: &[i64]) -> Result<(), EncodeError> {
        self.write_list_header(items.len())?;
        for &item in items {
            self.write_int(item);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_widths() {
        let cases: [(i64, &[u8]); 8] = [
            (0, &[0x00]),
            (-16, &[0xF0]),
            (127, &[0x7F]),
            (-17, &[INT_8, 0xEF]),
            (-128, &[INT_8, 0x80]),
            (128, &[INT_16, 0x00, 0x80]),
            (40_000, &[INT_32, 0x00, 0x00, 0x9C, 0x40]),
            (i64::MIN, &[INT_64, 0x80, 0, 0, 0, 0, 0, 0, 0]),
        ];

        for (value, expected) in cases {
            let mut writer = Writer::new();
            writer.write_int(value);
            assert_eq!(writer.as_bytes(), expected, "encoding {}", value);

            let mut reader = Reader::new(writer.as_bytes());
            assert_eq!(reader.read_int("test").unwrap(), value);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_int_accepts_wide_encoding_of_small_value() {
        let data = [INT_64, 0, 0, 0, 0, 0, 0, 0, 5];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_int("test").unwrap(), 5);
    }

    #[test]
    fn test_string_markers() {
        let short = "hello";
        let mut writer = Writer::new();
        writer.write_string(short).unwrap();
        assert_eq!(writer.as_bytes()[0], TINY_STRING | 5);

        let long = "x".repeat(300);
        let mut writer = Writer::new();
        writer.write_string(&long).unwrap();
        assert_eq!(&writer.as_bytes()[..3], &[STRING_16, 0x01, 0x2C]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_string(1000, "test").unwrap(), long);
    }

    #[test]
    fn test_string_too_long() {
        let mut writer = Writer::new();
        writer.write_string(&"a".repeat(200)).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        let result = reader.read_string(100, "test");
        assert!(matches!(
            result,
            Err(DecodeError::LengthExceedsLimit { len: 200, max: 100, .. })
        ));
    }

    #[test]
    fn test_string_invalid_utf8() {
        let data = [TINY_STRING | 2, 0xC3, 0x28];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_string(10, "name"),
            Err(DecodeError::InvalidUtf8 { field: "name" })
        ));
    }

    #[test]
    fn test_declared_length_beyond_input() {
        // claims 4 GiB of list elements but carries none
        let data = [LIST_32, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = Reader::new(&data);
        let len = reader.read_list_header(usize::MAX, "list").unwrap();
        assert_eq!(len, u32::MAX as usize);
        assert_eq!(reader.capacity_hint(len), 0);
    }

    #[test]
    fn test_struct_length_markers() {
        let mut writer = Writer::new();
        writer.write_struct_length(3).unwrap();
        writer.write_struct_length(20).unwrap();
        writer.write_struct_length(300).unwrap();
        assert_eq!(
            writer.as_bytes(),
            &[TINY_STRUCT | 3, STRUCT_8, 20, STRUCT_16, 0x01, 0x2C]
        );

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_struct_length("s").unwrap(), 3);
        assert_eq!(reader.read_struct_length("s").unwrap(), 20);
        assert_eq!(reader.read_struct_length("s").unwrap(), 300);
    }

    #[test]
    fn test_float_and_bool() {
        let mut writer = Writer::new();
        writer.write_float(1.5);
        writer.write_bool(true);
        writer.write_null();

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_float("f").unwrap(), 1.5);
        assert!(reader.read_bool("b").unwrap());
        reader.read_null("n").unwrap();
    }

    #[test]
    fn test_unexpected_marker() {
        let data = [FLOAT_64];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_int("id"),
            Err(DecodeError::UnexpectedMarker { marker: FLOAT_64, .. })
        ));
    }

    #[test]
    fn test_unexpected_eof() {
        let data = [INT_32, 0x00];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_int("id"),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_marker_type() {
        assert_eq!(MarkerType::of(0xF5), MarkerType::Integer);
        assert_eq!(MarkerType::of(0x8A), MarkerType::String);
        assert_eq!(MarkerType::of(STRUCT_16), MarkerType::Struct);
        assert_eq!(MarkerType::of(0xC4), MarkerType::Reserved);
    }
}
