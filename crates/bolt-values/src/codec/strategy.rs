//! Encoding variants negotiated per connection.
//!
//! Three variants share every scalar encoding and differ in exactly two
//! places: whether graph entities carry element-id strings, and whether
//! date-times are written as UTC or local wall-clock epoch seconds.

use std::fmt;

use tracing::debug;

use crate::codec::header::tag;

/// A negotiated protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Field layout of node and relationship structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLayout {
    /// Numeric ids followed by element-id strings.
    ElementIds,
    /// Numeric ids only.
    NumericIds,
}

/// Epoch-second frame of date-time structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeEncoding {
    /// Seconds since the epoch in UTC.
    Utc,
    /// Seconds since the epoch of the local wall-clock time.
    Local,
}

/// Struct encoding selected for a connection.
///
/// Fixed once negotiated; never changes mid-session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriterVariant {
    /// Element ids and UTC date-times.
    #[default]
    Default,
    /// Numeric ids only, UTC date-times.
    Utc,
    /// Numeric ids only, local date-times.
    Legacy,
}

impl WriterVariant {
    /// Picks the variant for a negotiated version and the `utc` patch flag.
    ///
    /// 5.x always uses element ids and UTC. On 4.3 and 4.4 the `utc` patch
    /// opts into UTC date-times; every other 4.x connection is legacy.
    pub fn negotiate(version: ProtocolVersion, utc_patch: bool) -> WriterVariant {
        let variant = if version.major >= 5 {
            WriterVariant::Default
        } else if version.major == 4 && version.minor >= 3 && utc_patch {
            WriterVariant::Utc
        } else {
            WriterVariant::Legacy
        };
        debug!(%version, utc_patch, ?variant, "negotiated struct encoding");
        variant
    }

    pub fn entity_layout(self) -> EntityLayout {
        match self {
            WriterVariant::Default => EntityLayout::ElementIds,
            WriterVariant::Utc | WriterVariant::Legacy => EntityLayout::NumericIds,
        }
    }

    pub fn date_time_encoding(self) -> DateTimeEncoding {
        match self {
            WriterVariant::Default | WriterVariant::Utc => DateTimeEncoding::Utc,
            WriterVariant::Legacy => DateTimeEncoding::Local,
        }
    }
}

impl EntityLayout {
    pub fn node_arity(self) -> u16 {
        match self {
            EntityLayout::ElementIds => 4,
            EntityLayout::NumericIds => 3,
        }
    }

    pub fn relationship_arity(self) -> u16 {
        match self {
            EntityLayout::ElementIds => 8,
            EntityLayout::NumericIds => 5,
        }
    }

    pub fn unbound_relationship_arity(self) -> u16 {
        match self {
            EntityLayout::ElementIds => 4,
            EntityLayout::NumericIds => 3,
        }
    }
}

impl DateTimeEncoding {
    /// Tag of the offset date-time struct.
    pub fn offset_tag(self) -> u8 {
        match self {
            DateTimeEncoding::Utc => tag::DATE_TIME,
            DateTimeEncoding::Local => tag::LEGACY_DATE_TIME,
        }
    }

    /// Tag of the zoned date-time struct.
    pub fn zone_id_tag(self) -> u8 {
        match self {
            DateTimeEncoding::Utc => tag::DATE_TIME_ZONE_ID,
            DateTimeEncoding::Local => tag::LEGACY_DATE_TIME_ZONE_ID,
        }
    }
}
