//! Graph entities: nodes, relationships and paths.

use crate::model::PropertyMap;

/// A node with labels and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub element_id: String,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl Node {
    /// Creates a node whose element id is its numeric id in decimal.
    pub fn new(id: i64, labels: Vec<String>, properties: PropertyMap) -> Self {
        Self {
            id,
            element_id: id.to_string(),
            labels,
            properties,
        }
    }

    /// Replaces the element id.
    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = element_id.into();
        self
    }
}

/// A relationship with both endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: i64,
    pub element_id: String,
    pub start_id: i64,
    pub start_element_id: String,
    pub end_id: i64,
    pub end_element_id: String,
    pub rel_type: String,
    pub properties: PropertyMap,
}

impl Relationship {
    /// Creates a relationship whose element ids are the numeric ids in decimal.
    pub fn new(
        id: i64,
        start_id: i64,
        end_id: i64,
        rel_type: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            id,
            element_id: id.to_string(),
            start_id,
            start_element_id: start_id.to_string(),
            end_id,
            end_element_id: end_id.to_string(),
            rel_type: rel_type.into(),
            properties,
        }
    }

    /// Creates a relationship between two nodes, taking endpoint ids from them.
    pub fn between(
        id: i64,
        start: &Node,
        end: &Node,
        rel_type: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            id,
            element_id: id.to_string(),
            start_id: start.id,
            start_element_id: start.element_id.clone(),
            end_id: end.id,
            end_element_id: end.element_id.clone(),
            rel_type: rel_type.into(),
            properties,
        }
    }

    /// Replaces the element id.
    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = element_id.into();
        self
    }

    /// Drops the endpoints.
    pub fn unbind(&self) -> UnboundRelationship {
        UnboundRelationship {
            id: self.id,
            element_id: self.element_id.clone(),
            rel_type: self.rel_type.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// A relationship whose endpoints are implied by its position in a path.
#[derive(Debug, Clone, PartialEq)]
pub struct UnboundRelationship {
    pub id: i64,
    pub element_id: String,
    pub rel_type: String,
    pub properties: PropertyMap,
}

impl UnboundRelationship {
    /// Attaches endpoints, producing a full relationship.
    pub fn bind(&self, start: &Node, end: &Node) -> Relationship {
        Relationship {
            id: self.id,
            element_id: self.element_id.clone(),
            start_id: start.id,
            start_element_id: start.element_id.clone(),
            end_id: end.id,
            end_element_id: end.element_id.clone(),
            rel_type: self.rel_type.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// An alternating walk of nodes and relationships.
///
/// `nodes[0]` is the origin; step `i` traverses `relationships[i]` from
/// `nodes[i]` to `nodes[i + 1]`, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

impl Path {
    pub fn new(nodes: Vec<Node>, relationships: Vec<Relationship>) -> Self {
        Self {
            nodes,
            relationships,
        }
    }

    /// The origin node, if the path has any nodes.
    pub fn start(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Number of traversal steps.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
