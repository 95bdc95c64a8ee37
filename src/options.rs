// Reader configuration

use serde::{Deserialize, Serialize};

/// Default bound on where an `ID3` marker may start
pub const DEFAULT_MAX_SEARCH_OFFSET: usize = 256 * 1024;

/// Default limit on atom nesting
pub const DEFAULT_MAX_ATOM_DEPTH: usize = 32;

/// Options shared by the ID3v2 and MP4 readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// An `ID3` marker is only accepted if it starts before this offset
    pub max_search_offset: usize,
    /// Atoms nested deeper than this make the file malformed
    pub max_atom_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            max_search_offset: DEFAULT_MAX_SEARCH_OFFSET,
            max_atom_depth: DEFAULT_MAX_ATOM_DEPTH,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_search_offset(mut self, offset: usize) -> Self {
        self.max_search_offset = offset;
        self
    }

    pub fn with_max_atom_depth(mut self, depth: usize) -> Self {
        self.max_atom_depth = depth;
        self
    }

    /// Parse options from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = ReadOptions::from_json(r#"{"max_atom_depth": 4}"#).unwrap();
        assert_eq!(options.max_atom_depth, 4);
        assert_eq!(options.max_search_offset, DEFAULT_MAX_SEARCH_OFFSET);
    }

    #[test]
    fn test_builder() {
        let options = ReadOptions::new().with_max_search_offset(10).with_max_atom_depth(2);
        assert_eq!(options.max_search_offset, 10);
        assert_eq!(options.max_atom_depth, 2);
    }
}
