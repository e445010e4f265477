//! Bolt structured values: the struct layer of the Bolt graph database
//! protocol, on top of the PackStream container format.
//!
//! This crate encodes and decodes the tagged structs exchanged between a
//! graph database server and its clients: temporal values, spatial points,
//! and graph entities (nodes, relationships and paths).
//!
//! # Quick Start
//!
//! ```rust
//! use bolt_values::codec::{decode_value, encode_value, ProtocolVersion, StructRegistry, WriterVariant};
//! use bolt_values::{Node, PropertyMap, Value};
//!
//! let variant = WriterVariant::negotiate(ProtocolVersion::new(5, 0), false);
//!
//! let node = Node::new(42, vec!["Person".to_string()], PropertyMap::new());
//! let bytes = encode_value(&Value::Node(node.clone()), variant).unwrap();
//!
//! let decoded = decode_value(&bytes, StructRegistry::for_records(variant)).unwrap();
//! assert_eq!(decoded, Value::Node(node));
//! ```
//!
//! # Variants
//!
//! The struct encoding is negotiated once per connection:
//! - [`WriterVariant::Default`]: element-id strings on entities, UTC date-times
//! - [`WriterVariant::Utc`]: numeric ids only, UTC date-times
//! - [`WriterVariant::Legacy`]: numeric ids only, local wall-clock date-times
//!
//! # Modules
//!
//! - [`model`]: Value types (temporal, spatial, graph entities)
//! - [`codec`]: Wire encoding/decoding and struct dispatch
//! - [`error`]: Error types
//! - [`limits`]: Limits for decoding untrusted input
//!
//! # Security
//!
//! Decoding is safe on untrusted input: every declared length is checked
//! against a limit before allocating, and nesting depth is bounded.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

pub use codec::{decode_value, encode_value, StructRegistry, WriterVariant};
pub use error::{DecodeError, EncodeError, ErrorKind, ValueError};
pub use limits::DecodeOptions;
pub use model::{
    Crs, Duration, Node, Path, Point, PropertyMap, Relationship, Temporal, UnboundRelationship,
    Value,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
