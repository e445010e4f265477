//! Container value encoding/decoding and struct dispatch.
//!
//! [`ValueReader`] reads any value, routing structs through a
//! [`StructRegistry`]. [`ValueWriter`] writes any value, routing structs
//! through the negotiated [`WriterVariant`]. Both are cheap to copy and
//! track nesting depth so adversarial input cannot exhaust the stack.

use crate::codec::header::read_header;
use crate::codec::primitives::{MarkerType, Reader, Writer};
use crate::codec::registry::StructRegistry;
use crate::codec::strategy::WriterVariant;
use crate::codec::{graph, path, spatial, temporal};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{DecodeOptions, MAX_NESTING_DEPTH};
use crate::model::{PropertyMap, Value};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes values against one struct catalog.
#[derive(Debug, Clone, Copy)]
pub struct ValueReader<'r> {
    registry: &'r StructRegistry,
    options: DecodeOptions,
    depth: usize,
}

impl<'r> ValueReader<'r> {
    /// Creates a reader with the default limits.
    pub fn new(registry: &'r StructRegistry) -> Self {
        Self::with_options(registry, DecodeOptions::default())
    }

    pub fn with_options(registry: &'r StructRegistry, options: DecodeOptions) -> Self {
        Self {
            registry,
            options,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r StructRegistry {
        self.registry
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Returns a reader one nesting level deeper.
    fn nested(&self) -> Result<ValueReader<'r>, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep {
                max: self.options.max_depth,
            });
        }
        Ok(ValueReader {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Reads one value of any type.
    pub fn read_value(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        match reader.peek_type("value")? {
            MarkerType::Null => {
                reader.read_null("null")?;
                Ok(Value::Null)
            }
            MarkerType::Boolean => Ok(Value::Boolean(reader.read_bool("boolean")?)),
            MarkerType::Integer => Ok(Value::Integer(reader.read_int("integer")?)),
            MarkerType::Float => Ok(Value::Float(reader.read_float("float")?)),
            MarkerType::Bytes => Ok(Value::Bytes(
                reader.read_byte_array(self.options.max_bytes_len, "bytes")?,
            )),
            MarkerType::String => Ok(Value::String(self.read_string(reader, "string")?)),
            MarkerType::List => {
                let nested = self.nested()?;
                Ok(Value::List(
                    self.read_list(reader, "list", |r| nested.read_value(r))?,
                ))
            }
            MarkerType::Map => Ok(Value::Map(self.read_map(reader, "map")?)),
            MarkerType::Struct => self.read_struct(reader),
            MarkerType::Reserved => Err(DecodeError::UnexpectedMarker {
                context: "value",
                marker: reader.read_byte("value")?,
            }),
        }
    }

    /// Reads a struct and dispatches it through the registry.
    pub fn read_struct(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let nested = self.nested()?;
        let header = read_header(reader)?;
        self.registry.decode(reader, header, &nested)
    }

    /// Reads a string within the configured length limit.
    pub fn read_string(&self, reader: &mut Reader<'_>, field: &'static str) -> Result<String, DecodeError> {
        reader.read_string(self.options.max_string_len, field)
    }

    /// Reads a list, decoding each element with `element`.
    ///
    /// Capacity is reserved only up to what the remaining input could hold.
    pub fn read_list<T, F>(
        &self,
        reader: &mut Reader<'_>,
        field: &'static str,
        mut element: F,
    ) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&mut Reader<'_>) -> Result<T, DecodeError>,
    {
        let len = reader.read_list_header(self.options.max_list_len, field)?;
        let mut items = Vec::with_capacity(reader.capacity_hint(len));
        for _ in 0..len {
            items.push(element(reader)?);
        }
        Ok(items)
    }

    /// Reads a list of strings.
    pub fn read_string_list(&self, reader: &mut Reader<'_>, field: &'static str) -> Result<Vec<String>, DecodeError> {
        self.read_list(reader, field, |r| self.read_string(r, field))
    }

    /// Reads a list of integers.
    pub fn read_int_list(&self, reader: &mut Reader<'_>, field: &'static str) -> Result<Vec<i64>, DecodeError> {
        self.read_list(reader, field, |r| r.read_int(field))
    }

    /// Reads a string-keyed map of values.
    ///
    /// A repeated key keeps the last value.
    pub fn read_map(&self, reader: &mut Reader<'_>, field: &'static str) -> Result<PropertyMap, DecodeError> {
        let nested = self.nested()?;
        let len = reader.read_map_header(self.options.max_map_len, field)?;
        let mut map = PropertyMap::new();
        for _ in 0..len {
            let key = self.read_string(reader, "map key")?;
            let value = nested.read_value(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Decodes exactly one value from `input`.
pub fn decode_value(input: &[u8], registry: &StructRegistry) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(input);
    let value = ValueReader::new(registry).read_value(&mut reader)?;
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes {
            count: reader.remaining_len(),
        });
    }
    Ok(value)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes values with one negotiated variant.
#[derive(Debug, Clone, Copy)]
pub struct ValueWriter {
    variant: WriterVariant,
    depth: usize,
}

impl ValueWriter {
    pub fn new(variant: WriterVariant) -> Self {
        Self { variant, depth: 0 }
    }

    pub fn variant(&self) -> WriterVariant {
        self.variant
    }

    fn nested(&self) -> Result<ValueWriter, EncodeError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(EncodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(ValueWriter {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Writes one value of any type.
    pub fn write_value(&self, writer: &mut Writer, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => writer.write_null(),
            Value::Boolean(v) => writer.write_bool(*v),
            Value::Integer(v) => writer.write_int(*v),
            Value::Float(v) => writer.write_float(*v),
            Value::Bytes(v) => writer.write_byte_array(v)?,
            Value::String(v) => writer.write_string(v)?,
            Value::List(items) => {
                let nested = self.nested()?;
                writer.write_list_header(items.len())?;
                for item in items {
                    nested.write_value(writer, item)?;
                }
            }
            Value::Map(map) => self.write_map(writer, map)?,
            Value::Temporal(v) => {
                self.nested()?;
                temporal::write_temporal(writer, v, self.variant.date_time_encoding())?
            }
            Value::Point(v) => {
                self.nested()?;
                spatial::write_point(writer, v)?
            }
            Value::Node(v) => graph::write_node(writer, v, &self.nested()?)?,
            Value::Relationship(v) => graph::write_relationship(writer, v, &self.nested()?)?,
            Value::UnboundRelationship(v) => {
                graph::write_unbound_relationship(writer, v, &self.nested()?)?
            }
            Value::Path(v) => path::write_path(writer, v, &self.nested()?)?,
        }
        Ok(())
    }

    /// Writes a string-keyed map of values.
    pub fn write_map(&self, writer: &mut Writer, map: &PropertyMap) -> Result<(), EncodeError> {
        let nested = self.nested()?;
        writer.write_map_header(map.len())?;
        for (key, value) in map {
            writer.write_string(key)?;
            nested.write_value(writer, value)?;
        }
        Ok(())
    }
}

/// Encodes one value with the given variant.
pub fn encode_value(value: &Value, variant: WriterVariant) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    ValueWriter::new(variant).write_value(&mut writer, value)?;
    Ok(writer.into_bytes())
}
