//! Security limits for decoding untrusted input.
//!
//! Every length read from the wire is checked against one of these before
//! anything is allocated for it.

/// Maximum UTF-8 string length in bytes.
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Maximum byte array length.
pub const MAX_BYTES_LEN: usize = 64 * 1024 * 1024;

/// Maximum number of list elements.
pub const MAX_LIST_LEN: usize = 1024 * 1024;

/// Maximum number of map entries.
pub const MAX_MAP_LEN: usize = 1024 * 1024;

/// Maximum nesting of lists, maps and structs.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Per-reader overrides of the default limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_string_len: usize,
    pub max_bytes_len: usize,
    pub max_list_len: usize,
    pub max_map_len: usize,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_string_len: MAX_STRING_LEN,
            max_bytes_len: MAX_BYTES_LEN,
            max_list_len: MAX_LIST_LEN,
            max_map_len: MAX_MAP_LEN,
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum string length in bytes.
    pub fn max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }

    /// Sets the maximum number of elements in a list and entries in a map.
    pub fn max_collection_len(mut self, len: usize) -> Self {
        self.max_list_len = len;
        self.max_map_len = len;
        self
    }
}
