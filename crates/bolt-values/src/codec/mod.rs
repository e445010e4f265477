//! Binary encoding/decoding of structured values.
//!
//! Scalars and containers follow the PackStream marker layout. Structs
//! carry a one-byte tag and are dispatched through a [`StructRegistry`]
//! chosen by the negotiated [`WriterVariant`].

pub mod graph;
pub mod header;
pub mod path;
pub mod primitives;
pub mod registry;
pub mod spatial;
pub mod strategy;
pub mod temporal;
pub mod value;

pub use header::{tag, StructHeader};
pub use path::{compact_path, CompactPath};
pub use primitives::{Reader, Writer};
pub use registry::{RegistryBuilder, RegistryScope, StructDecoder, StructRegistry};
pub use strategy::{DateTimeEncoding, EntityLayout, ProtocolVersion, WriterVariant};
pub use value::{decode_value, encode_value, ValueReader, ValueWriter};
