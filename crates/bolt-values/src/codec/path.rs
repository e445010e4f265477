//! Path struct encoding/decoding.
//!
//! A path `P` is written as three lists: the distinct nodes, the distinct
//! relationships in unbound form, and a flat sequence of indices. Each step
//! contributes two indices:
//! - a relationship index, 1-based into the relationship list, positive
//!   when the step follows the relationship's direction and negative when
//!   it goes against it
//! - a node index, 0-based into the node list, naming the node reached
//!
//! The first node of the node list is always the origin.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::codec::graph::{self, NodeDecoder, UnboundRelationshipDecoder};
use crate::codec::header::{read_header, tag, write_header};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::StructDecoder;
use crate::codec::strategy::EntityLayout;
use crate::codec::value::{ValueReader, ValueWriter};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Node, Path, Relationship, UnboundRelationship, Value};

// =============================================================================
// ENCODING
// =============================================================================

/// Deduplicated form of a path, borrowing from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactPath<'p> {
    /// Distinct nodes in order of first appearance, origin first.
    pub nodes: Vec<&'p Node>,
    /// Distinct relationships in order of first appearance.
    pub relationships: Vec<&'p Relationship>,
    /// Two entries per step: signed relationship index, node index.
    pub indices: Vec<i64>,
}

/// Deduplicates a path's entities and computes its step indices.
///
/// Nodes and relationships are identified by numeric id. Each relationship
/// must touch the node the walk is currently at.
pub fn compact_path(path: &Path) -> Result<CompactPath<'_>, EncodeError> {
    let Some(origin) = path.start() else {
        return Err(EncodeError::argument("nodes", "path must contain at least one node"));
    };
    if path.is_empty() {
        return Ok(CompactPath {
            nodes: vec![origin],
            relationships: Vec::new(),
            indices: Vec::new(),
        });
    }

    let mut nodes = Vec::new();
    let mut node_positions: FxHashMap<i64, usize> = FxHashMap::default();
    for node in &path.nodes {
        node_positions.entry(node.id).or_insert_with(|| {
            nodes.push(node);
            nodes.len() - 1
        });
    }

    let mut relationships = Vec::new();
    let mut rel_positions: FxHashMap<i64, usize> = FxHashMap::default();
    let mut indices = Vec::with_capacity(path.relationships.len() * 2);
    let mut current = origin.id;

    for (step, rel) in path.relationships.iter().enumerate() {
        let position = *rel_positions.entry(rel.id).or_insert_with(|| {
            relationships.push(rel);
            relationships.len() - 1
        });
        let rel_index = position as i64 + 1;

        let (signed, target) = if rel.start_id == current {
            (rel_index, rel.end_id)
        } else if rel.end_id == current {
            (-rel_index, rel.start_id)
        } else {
            return Err(EncodeError::argument(
                "relationships",
                format!("relationship #{} (id {}) does not touch node {}", step, rel.id, current),
            ));
        };
        let node_index = node_positions.get(&target).ok_or_else(|| {
            EncodeError::argument("nodes", format!("cannot locate target node for relationship #{}", step))
        })?;

        indices.push(signed);
        indices.push(*node_index as i64);
        current = target;
    }

    Ok(CompactPath {
        nodes,
        relationships,
        indices,
    })
}

/// Writes a path in compact form.
pub fn write_path(writer: &mut Writer, path: &Path, values: &ValueWriter) -> Result<(), EncodeError> {
    let compact = compact_path(path)?;
    trace!(
        steps = path.len(),
        nodes = compact.nodes.len(),
        relationships = compact.relationships.len(),
        "compacted path"
    );

    write_header(writer, tag::PATH, 3)?;
    writer.write_list_header(compact.nodes.len())?;
    for node in &compact.nodes {
        graph::write_node(writer, node, values)?;
    }
    writer.write_list_header(compact.relationships.len())?;
    for rel in &compact.relationships {
        graph::write_relationship_unbound(writer, rel, values)?;
    }
    writer.write_int_list(&compact.indices)?;
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

static ELEMENT_ID_PATH: PathDecoder = PathDecoder {
    layout: EntityLayout::ElementIds,
};
static NUMERIC_ID_PATH: PathDecoder = PathDecoder {
    layout: EntityLayout::NumericIds,
};

/// Path decoder for one entity layout.
pub fn decoder(layout: EntityLayout) -> &'static dyn StructDecoder {
    match layout {
        EntityLayout::ElementIds => &ELEMENT_ID_PATH,
        EntityLayout::NumericIds => &NUMERIC_ID_PATH,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathDecoder {
    layout: EntityLayout,
}

impl PathDecoder {
    fn read_node(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Node, DecodeError> {
        let header = read_header(reader)?;
        if header.tag != tag::NODE {
            return Err(DecodeError::argument(
                "nodes",
                format!("expected node struct, found tag 0x{:02X}", header.tag),
            ));
        }
        header.expect_length(self.layout.node_arity())?;
        NodeDecoder::new(self.layout).read(reader, values)
    }

    fn read_relationship(
        &self,
        reader: &mut Reader<'_>,
        values: &ValueReader<'_>,
    ) -> Result<UnboundRelationship, DecodeError> {
        let header = read_header(reader)?;
        if header.tag != tag::UNBOUND_RELATIONSHIP {
            return Err(DecodeError::argument(
                "relationships",
                format!("expected unbound relationship struct, found tag 0x{:02X}", header.tag),
            ));
        }
        header.expect_length(self.layout.unbound_relationship_arity())?;
        UnboundRelationshipDecoder::new(self.layout).read(reader, values)
    }
}

impl StructDecoder for PathDecoder {
    fn tag(&self) -> u8 {
        tag::PATH
    }

    fn arity(&self) -> u16 {
        3
    }

    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let nodes = values.read_list(reader, "nodes", |r| self.read_node(r, values))?;
        let relationships = values.read_list(reader, "relationships", |r| self.read_relationship(r, values))?;
        let indices = values.read_int_list(reader, "indices")?;
        Ok(Value::Path(expand_path(nodes, &relationships, &indices)?))
    }
}

/// Rebuilds a path from its compact form, binding each relationship to the
/// nodes of its step.
pub fn expand_path(
    nodes: Vec<Node>,
    relationships: &[UnboundRelationship],
    indices: &[i64],
) -> Result<Path, DecodeError> {
    if nodes.is_empty() {
        return Err(DecodeError::argument("nodes", "path must contain at least one node"));
    }
    if indices.len() % 2 != 0 {
        return Err(DecodeError::argument(
            "indices",
            format!("expected an even number of indices, got {}", indices.len()),
        ));
    }

    let steps = indices.len() / 2;
    let mut path_nodes = Vec::with_capacity(steps + 1);
    let mut path_rels = Vec::with_capacity(steps);
    let mut previous = 0usize;
    path_nodes.push(nodes[0].clone());

    for pair in indices.chunks_exact(2) {
        let (rel_index, node_index) = (pair[0], pair[1]);

        let magnitude = rel_index.unsigned_abs();
        if rel_index == 0 || magnitude > relationships.len() as u64 {
            return Err(DecodeError::argument(
                "indices",
                format!(
                    "relationship index {} out of range for {} relationships",
                    rel_index,
                    relationships.len()
                ),
            ));
        }
        let next = usize::try_from(node_index)
            .ok()
            .filter(|&i| i < nodes.len())
            .ok_or_else(|| {
                DecodeError::argument(
                    "indices",
                    format!("node index {} out of range for {} nodes", node_index, nodes.len()),
                )
            })?;

        let unbound = &relationships[magnitude as usize - 1];
        let rel = if rel_index > 0 {
            unbound.bind(&nodes[previous], &nodes[next])
        } else {
            unbound.bind(&nodes[next], &nodes[previous])
        };
        path_rels.push(rel);
        path_nodes.push(nodes[next].clone());
        previous = next;
    }

    Ok(Path::new(path_nodes, path_rels))
}
