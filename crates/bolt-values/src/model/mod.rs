//! Data model types for structured values.
//!
//! Plain data with no I/O:
//! - Temporal values (dates, times, date-times, durations)
//! - Spatial points and coordinate reference systems
//! - Graph entities (nodes, relationships, paths)
//! - The container value tree tying them together

pub mod graph;
pub mod spatial;
pub mod temporal;
pub mod value;

pub use graph::{Node, Path, Relationship, UnboundRelationship};
pub use spatial::{Crs, Point};
pub use temporal::{Duration, Temporal};
pub use value::{PropertyMap, Value};
