// ID3 metadata handling module
pub mod frames;
pub mod v2;

use std::path::Path;

pub use frames::{FrameHeader, FrameLayout};
pub use v2::{Id3Reader, Id3v2Header};

use crate::error::TagResult;
use crate::tag::Tag;

/// Read the ID3v2 tag of a file with default options
pub fn read(path: impl AsRef<Path>) -> TagResult<Option<Tag>> {
    Id3Reader::default().read(path)
}

pub fn read_from_bytes(data: &[u8]) -> TagResult<Option<Tag>> {
    Id3Reader::default().read_from_bytes(data)
}
