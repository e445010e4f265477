//! Tag-to-decoder dispatch.
//!
//! Each negotiated variant owns two immutable catalogs, built once on
//! first use and shared by every connection:
//! - **parameters**: temporal and spatial structs, the only structs a
//!   client may send as query parameters
//! - **records**: parameters plus graph entities, for reading result records

use std::fmt;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::header::StructHeader;
use crate::codec::primitives::Reader;
use crate::codec::strategy::WriterVariant;
use crate::codec::value::ValueReader;
use crate::codec::{graph, path, spatial, temporal};
use crate::error::DecodeError;
use crate::model::Value;

/// Decoder for one struct tag.
///
/// Implementations are stateless and shared across all connections.
pub trait StructDecoder: Send + Sync {
    /// Tag this decoder handles.
    fn tag(&self) -> u8;

    /// Exact field count the struct must declare.
    fn arity(&self) -> u16;

    /// Decodes the struct fields. The header has already been read and its
    /// length checked against [`arity`](StructDecoder::arity).
    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError>;
}

/// Which structs a catalog accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryScope {
    Parameters,
    Records,
}

/// Immutable mapping from struct tag to decoder.
pub struct StructRegistry {
    variant: WriterVariant,
    scope: RegistryScope,
    decoders: FxHashMap<u8, &'static dyn StructDecoder>,
}

lazy_static! {
    static ref DEFAULT_PARAMETERS: StructRegistry =
        StructRegistry::build(WriterVariant::Default, RegistryScope::Parameters);
    static ref DEFAULT_RECORDS: StructRegistry =
        StructRegistry::build(WriterVariant::Default, RegistryScope::Records);
    static ref UTC_PARAMETERS: StructRegistry =
        StructRegistry::build(WriterVariant::Utc, RegistryScope::Parameters);
    static ref UTC_RECORDS: StructRegistry =
        StructRegistry::build(WriterVariant::Utc, RegistryScope::Records);
    static ref LEGACY_PARAMETERS: StructRegistry =
        StructRegistry::build(WriterVariant::Legacy, RegistryScope::Parameters);
    static ref LEGACY_RECORDS: StructRegistry =
        StructRegistry::build(WriterVariant::Legacy, RegistryScope::Records);
}

impl StructRegistry {
    /// Shared catalog of structs accepted as query parameters.
    pub fn for_parameters(variant: WriterVariant) -> &'static StructRegistry {
        match variant {
            WriterVariant::Default => &*DEFAULT_PARAMETERS,
            WriterVariant::Utc => &*UTC_PARAMETERS,
            WriterVariant::Legacy => &*LEGACY_PARAMETERS,
        }
    }

    /// Shared catalog of structs that appear in result records.
    pub fn for_records(variant: WriterVariant) -> &'static StructRegistry {
        match variant {
            WriterVariant::Default => &*DEFAULT_RECORDS,
            WriterVariant::Utc => &*UTC_RECORDS,
            WriterVariant::Legacy => &*LEGACY_RECORDS,
        }
    }

    /// Starts an empty catalog for custom dispatch tables.
    pub fn builder(variant: WriterVariant) -> RegistryBuilder {
        RegistryBuilder {
            registry: StructRegistry {
                variant,
                scope: RegistryScope::Parameters,
                decoders: FxHashMap::default(),
            },
        }
    }

    fn build(variant: WriterVariant, scope: RegistryScope) -> StructRegistry {
        let encoding = variant.date_time_encoding();
        let mut builder = StructRegistry::builder(variant)
            .register_all(temporal::decoders(encoding))
            .register_all(spatial::decoders());
        if scope == RegistryScope::Records {
            builder = builder
                .register_all(graph::decoders(variant.entity_layout()))
                .register(path::decoder(variant.entity_layout()));
        }
        let mut registry = builder.build();
        registry.scope = scope;
        registry
    }

    pub fn variant(&self) -> WriterVariant {
        self.variant
    }

    pub fn scope(&self) -> RegistryScope {
        self.scope
    }

    /// Looks up the decoder for a tag.
    pub fn get(&self, tag: u8) -> Option<&'static dyn StructDecoder> {
        self.decoders.get(&tag).copied()
    }

    pub fn contains(&self, tag: u8) -> bool {
        self.decoders.contains_key(&tag)
    }

    /// Registered tags in ascending order.
    pub fn tags(&self) -> Vec<u8> {
        let mut tags: Vec<u8> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Dispatches a struct body to its decoder after checking its arity.
    pub fn decode(
        &self,
        reader: &mut Reader<'_>,
        header: StructHeader,
        values: &ValueReader<'_>,
    ) -> Result<Value, DecodeError> {
        let Some(decoder) = self.get(header.tag) else {
            debug!(
                tag = header.tag,
                variant = ?self.variant,
                scope = ?self.scope,
                "no decoder registered for struct tag"
            );
            return Err(DecodeError::UnknownStruct { tag: header.tag });
        };
        header.expect_length(decoder.arity())?;
        decoder.decode(reader, values)
    }
}

impl fmt::Debug for StructRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<char> = self.tags().into_iter().map(char::from).collect();
        f.debug_struct("StructRegistry")
            .field("variant", &self.variant)
            .field("scope", &self.scope)
            .field("tags", &tags)
            .finish()
    }
}

/// Builder for a [`StructRegistry`]; the built registry cannot be mutated.
pub struct RegistryBuilder {
    registry: StructRegistry,
}

impl RegistryBuilder {
    /// Adds a decoder, replacing any earlier one for the same tag.
    pub fn register(mut self, decoder: &'static dyn StructDecoder) -> Self {
        self.registry.decoders.insert(decoder.tag(), decoder);
        self
    }

    pub fn register_all<I>(mut self, decoders: I) -> Self
    where
        I: IntoIterator<Item = &'static dyn StructDecoder>,
    {
        for decoder in decoders {
            self = self.register(decoder);
        }
        self
    }

    pub fn build(self) -> StructRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::header::tag;

    #[test]
    fn test_parameter_catalogs() {
        let default = StructRegistry::for_parameters(WriterVariant::Default);
        assert!(default.contains(tag::DATE_TIME));
        assert!(default.contains(tag::DATE_TIME_ZONE_ID));
        assert!(!default.contains(tag::LEGACY_DATE_TIME));
        assert!(!default.contains(tag::NODE));

        let legacy = StructRegistry::for_parameters(WriterVariant::Legacy);
        assert!(legacy.contains(tag::LEGACY_DATE_TIME));
        assert!(legacy.contains(tag::LEGACY_DATE_TIME_ZONE_ID));
        assert!(!legacy.contains(tag::DATE_TIME));
        assert_eq!(legacy.tags().len(), 9);
    }

    #[test]
    fn test_record_catalogs() {
        let records = StructRegistry::for_records(WriterVariant::Utc);
        for t in [tag::NODE, tag::RELATIONSHIP, tag::UNBOUND_RELATIONSHIP, tag::PATH] {
            assert!(records.contains(t), "missing tag {}", char::from(t));
        }
        assert_eq!(records.scope(), RegistryScope::Records);
        assert_eq!(records.tags().len(), 13);
        assert_eq!(records.get(tag::NODE).map(|d| d.arity()), Some(3));

        let default = StructRegistry::for_records(WriterVariant::Default);
        assert_eq!(default.get(tag::NODE).map(|d| d.arity()), Some(4));
        assert_eq!(default.get(tag::RELATIONSHIP).map(|d| d.arity()), Some(8));
    }

    #[test]
    fn test_catalogs_are_shared() {
        let a = StructRegistry::for_records(WriterVariant::Legacy);
        let b = StructRegistry::for_records(WriterVariant::Legacy);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_unknown_tag() {
        let registry = StructRegistry::for_parameters(WriterVariant::Default);
        let values = ValueReader::new(registry);
        let mut reader = Reader::new(&[]);
        let result = registry.decode(&mut reader, StructHeader::new(b'Z', 0), &values);
        assert_eq!(result, Err(DecodeError::UnknownStruct { tag: b'Z' }));
    }

    #[test]
    fn test_custom_registry() {
        let registry = StructRegistry::builder(WriterVariant::Default)
            .register_all(spatial::decoders())
            .build();
        assert_eq!(registry.tags(), vec![tag::POINT_2D, tag::POINT_3D]);
    }
}
