//! Node and relationship struct encoding/decoding.
//!
//! | Struct | Numeric-id layout | Element-id layout adds |
//! |---|---|---|
//! | Node `N` | id, labels, properties | element_id |
//! | Relationship `R` | id, start_id, end_id, type, properties | element_id, start_element_id, end_element_id |
//! | UnboundRelationship `r` | id, type, properties | element_id |

use crate::codec::header::{tag, write_header};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::StructDecoder;
use crate::codec::strategy::EntityLayout;
use crate::codec::value::{ValueReader, ValueWriter};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Node, PropertyMap, Relationship, UnboundRelationship, Value};

// =============================================================================
// ENCODING
// =============================================================================

/// Writes a node in the layout of the writer's variant.
pub fn write_node(writer: &mut Writer, node: &Node, values: &ValueWriter) -> Result<(), EncodeError> {
    let layout = values.variant().entity_layout();
    write_header(writer, tag::NODE, layout.node_arity())?;
    writer.write_int(node.id);
    writer.write_string_list(&node.labels)?;
    values.write_map(writer, &node.properties)?;
    if layout == EntityLayout::ElementIds {
        writer.write_string(&node.element_id)?;
    }
    Ok(())
}

/// Writes a relationship in the layout of the writer's variant.
pub fn write_relationship(writer: &mut Writer, rel: &Relationship, values: &ValueWriter) -> Result<(), EncodeError> {
    let layout = values.variant().entity_layout();
    write_header(writer, tag::RELATIONSHIP, layout.relationship_arity())?;
    writer.write_int(rel.id);
    writer.write_int(rel.start_id);
    writer.write_int(rel.end_id);
    writer.write_string(&rel.rel_type)?;
    values.write_map(writer, &rel.properties)?;
    if layout == EntityLayout::ElementIds {
        writer.write_string(&rel.element_id)?;
        writer.write_string(&rel.start_element_id)?;
        writer.write_string(&rel.end_element_id)?;
    }
    Ok(())
}

/// Writes a relationship without endpoints, as used inside paths.
pub fn write_unbound_relationship(
    writer: &mut Writer,
    rel: &UnboundRelationship,
    values: &ValueWriter,
) -> Result<(), EncodeError> {
    write_unbound(writer, rel.id, &rel.element_id, &rel.rel_type, &rel.properties, values)
}

/// Writes the unbound form of a relationship, dropping its endpoints.
pub(crate) fn write_relationship_unbound(
    writer: &mut Writer,
    rel: &Relationship,
    values: &ValueWriter,
) -> Result<(), EncodeError> {
    write_unbound(writer, rel.id, &rel.element_id, &rel.rel_type, &rel.properties, values)
}

fn write_unbound(
    writer: &mut Writer,
    id: i64,
    element_id: &str,
    rel_type: &str,
    properties: &PropertyMap,
    values: &ValueWriter,
) -> Result<(), EncodeError> {
    let layout = values.variant().entity_layout();
    write_header(writer, tag::UNBOUND_RELATIONSHIP, layout.unbound_relationship_arity())?;
    writer.write_int(id);
    writer.write_string(rel_type)?;
    values.write_map(writer, properties)?;
    if layout == EntityLayout::ElementIds {
        writer.write_string(element_id)?;
    }
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decoders for the entity structs of one layout.
pub fn decoders(layout: EntityLayout) -> [&'static dyn StructDecoder; 3] {
    let (node, rel, unbound) = match layout {
        EntityLayout::ElementIds => (&ELEMENT_ID_NODE, &ELEMENT_ID_RELATIONSHIP, &ELEMENT_ID_UNBOUND),
        EntityLayout::NumericIds => (&NUMERIC_ID_NODE, &NUMERIC_ID_RELATIONSHIP, &NUMERIC_ID_UNBOUND),
    };
    [node, rel, unbound]
}

static ELEMENT_ID_NODE: NodeDecoder = NodeDecoder {
    layout: EntityLayout::ElementIds,
};
static NUMERIC_ID_NODE: NodeDecoder = NodeDecoder {
    layout: EntityLayout::NumericIds,
};
static ELEMENT_ID_RELATIONSHIP: RelationshipDecoder = RelationshipDecoder {
    layout: EntityLayout::ElementIds,
};
static NUMERIC_ID_RELATIONSHIP: RelationshipDecoder = RelationshipDecoder {
    layout: EntityLayout::NumericIds,
};
static ELEMENT_ID_UNBOUND: UnboundRelationshipDecoder = UnboundRelationshipDecoder {
    layout: EntityLayout::ElementIds,
};
static NUMERIC_ID_UNBOUND: UnboundRelationshipDecoder = UnboundRelationshipDecoder {
    layout: EntityLayout::NumericIds,
};

/// Reads the trailing element id, or derives it from the numeric id.
fn read_element_id(
    layout: EntityLayout,
    id: i64,
    reader: &mut Reader<'_>,
    values: &ValueReader<'_>,
    field: &'static str,
) -> Result<String, DecodeError> {
    match layout {
        EntityLayout::ElementIds => values.read_string(reader, field),
        EntityLayout::NumericIds => Ok(id.to_string()),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeDecoder {
    layout: EntityLayout,
}

impl NodeDecoder {
    pub(crate) fn new(layout: EntityLayout) -> Self {
        Self { layout }
    }

    pub(crate) fn read(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Node, DecodeError> {
        let id = reader.read_int("id")?;
        let labels = values.read_string_list(reader, "labels")?;
        let properties = values.read_map(reader, "properties")?;
        let element_id = read_element_id(self.layout, id, reader, values, "element_id")?;
        Ok(Node {
            id,
            element_id,
            labels,
            properties,
        })
    }
}

impl StructDecoder for NodeDecoder {
    fn tag(&self) -> u8 {
        tag::NODE
    }

    fn arity(&self) -> u16 {
        self.layout.node_arity()
    }

    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Node(self.read(reader, values)?))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelationshipDecoder {
    layout: EntityLayout,
}

impl StructDecoder for RelationshipDecoder {
    fn tag(&self) -> u8 {
        tag::RELATIONSHIP
    }

    fn arity(&self) -> u16 {
        self.layout.relationship_arity()
    }

    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let id = reader.read_int("id")?;
        let start_id = reader.read_int("start_id")?;
        let end_id = reader.read_int("end_id")?;
        let rel_type = values.read_string(reader, "type")?;
        let properties = values.read_map(reader, "properties")?;
        let element_id = read_element_id(self.layout, id, reader, values, "element_id")?;
        let start_element_id = read_element_id(self.layout, start_id, reader, values, "start_element_id")?;
        let end_element_id = read_element_id(self.layout, end_id, reader, values, "end_element_id")?;
        Ok(Value::Relationship(Relationship {
            id,
            element_id,
            start_id,
            start_element_id,
            end_id,
            end_element_id,
            rel_type,
            properties,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UnboundRelationshipDecoder {
    layout: EntityLayout,
}

impl UnboundRelationshipDecoder {
    pub(crate) fn new(layout: EntityLayout) -> Self {
        Self { layout }
    }

    pub(crate) fn read(
        &self,
        reader: &mut Reader<'_>,
        values: &ValueReader<'_>,
    ) -> Result<UnboundRelationship, DecodeError> {
        let id = reader.read_int("id")?;
        let rel_type = values.read_string(reader, "type")?;
        let properties = values.read_map(reader, "properties")?;
        let element_id = read_element_id(self.layout, id, reader, values, "element_id")?;
        Ok(UnboundRelationship {
            id,
            element_id,
            rel_type,
            properties,
        })
    }
}

impl StructDecoder for UnboundRelationshipDecoder {
    fn tag(&self) -> u8 {
        tag::UNBOUND_RELATIONSHIP
    }

    fn arity(&self) -> u16 {
        self.layout.unbound_relationship_arity()
    }

    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError> {
        Ok(Value::UnboundRelationship(self.read(reader, values)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::registry::StructRegistry;
    use crate::codec::strategy::WriterVariant;
    use crate::codec::value::{decode_value, encode_value};

    fn alice() -> Node {
        let mut props = PropertyMap::new();
        props.insert("name".to_string(), Value::from("Alice"));
        Node::new(7, vec!["Person".to_string()], props).with_element_id("4:db:7")
    }

    fn knows() -> Relationship {
        Relationship::new(3, 7, 8, "KNOWS", PropertyMap::new()).with_element_id("5:db:3")
    }

    #[test]
    fn test_node_element_id_layout() {
        let bytes = encode_value(&Value::Node(alice()), WriterVariant::Default).unwrap();

        let mut expected = vec![0xB4, b'N', 0x07, 0x91, 0x86];
        expected.extend_from_slice(b"Person");
        expected.extend_from_slice(&[0xA1, 0x84]);
        expected.extend_from_slice(b"name");
        expected.push(0x85);
        expected.extend_from_slice(b"Alice");
        expected.push(0x86);
        expected.extend_from_slice(b"4:db:7");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_node_numeric_id_layout() {
        for variant in [WriterVariant::Utc, WriterVariant::Legacy] {
            let bytes = encode_value(&Value::Node(alice()), variant).unwrap();
            assert_eq!(&bytes[..3], &[0xB3, b'N', 0x07]);
            assert!(!bytes.windows(6).any(|w| w == b"4:db:7"));
        }
    }

    #[test]
    fn test_relationship_layouts() {
        let bytes = encode_value(&Value::Relationship(knows()), WriterVariant::Default).unwrap();
        let mut expected = vec![0xB8, b'R', 0x03, 0x07, 0x08, 0x85];
        expected.extend_from_slice(b"KNOWS");
        expected.extend_from_slice(&[0xA0, 0x86]);
        expected.extend_from_slice(b"5:db:3");
        expected.extend_from_slice(&[0x81, b'7', 0x81, b'8']);
        assert_eq!(bytes, expected);

        let bytes = encode_value(&Value::Relationship(knows()), WriterVariant::Legacy).unwrap();
        let mut expected = vec![0xB5, b'R', 0x03, 0x07, 0x08, 0x85];
        expected.extend_from_slice(b"KNOWS");
        expected.push(0xA0);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_unbound_relationship_layouts() {
        let rel = knows().unbind();
        let bytes = encode_value(&Value::UnboundRelationship(rel.clone()), WriterVariant::Default).unwrap();
        let mut expected = vec![0xB4, b'r', 0x03, 0x85];
        expected.extend_from_slice(b"KNOWS");
        expected.extend_from_slice(&[0xA0, 0x86]);
        expected.extend_from_slice(b"5:db:3");
        assert_eq!(bytes, expected);

        let bytes = encode_value(&Value::UnboundRelationship(rel), WriterVariant::Utc).unwrap();
        assert_eq!(&bytes[..2], &[0xB3, b'r']);
    }

    #[test]
    fn test_entity_roundtrip_element_ids() {
        let registry = StructRegistry::for_records(WriterVariant::Default);
        for value in [
            Value::Node(alice()),
            Value::Relationship(knows()),
            Value::UnboundRelationship(knows().unbind()),
        ] {
            let bytes = encode_value(&value, WriterVariant::Default).unwrap();
            assert_eq!(decode_value(&bytes, registry).unwrap(), value);
        }
    }

    #[test]
    fn test_numeric_id_decode_derives_element_ids() {
        let registry = StructRegistry::for_records(WriterVariant::Legacy);
        let bytes = encode_value(&Value::Relationship(knows()), WriterVariant::Legacy).unwrap();
        match decode_value(&bytes, registry).unwrap() {
            Value::Relationship(rel) => {
                assert_eq!(rel.element_id, "3");
                assert_eq!(rel.start_element_id, "7");
                assert_eq!(rel.end_element_id, "8");
                assert_eq!(rel.rel_type, "KNOWS");
            }
            other => panic!("expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_mismatch_is_struct_size() {
        let bytes = encode_value(&Value::Node(alice()), WriterVariant::Default).unwrap();
        let registry = StructRegistry::for_records(WriterVariant::Utc);
        assert_eq!(
            decode_value(&bytes, registry),
            Err(DecodeError::StructSize {
                tag: tag::NODE,
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_entities_rejected_as_parameters() {
        let bytes = encode_value(&Value::Node(alice()), WriterVariant::Default).unwrap();
        let registry = StructRegistry::for_parameters(WriterVariant::Default);
        assert_eq!(
            decode_value(&bytes, registry),
            Err(DecodeError::UnknownStruct { tag: tag::NODE })
        );
    }
}
