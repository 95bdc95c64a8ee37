// Error types shared by the ID3v2 and MP4 readers

use thiserror::Error;

use crate::utils::cursor::CursorError;

/// Result alias used throughout the crate
pub type TagResult<T> = Result<T, TagError>;

/// Errors a tag read can end with
///
/// A read either yields a tag (or, for ID3, an explicit "no tag") or one of
/// these. There is never a partial tag alongside an error.
#[derive(Debug, Error)]
pub enum TagError {
    /// The file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tag uses a feature this reader does not parse (ID3 extended header)
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A text frame declared an encoding byte that is invalid for its version
    #[error("unsupported text encoding {encoding} for ID3v2.{major}")]
    UnsupportedEncoding { encoding: u8, major: u8 },

    /// The container structure is inconsistent
    #[error("malformed file: {0}")]
    MalformedFile(String),
}

impl From<CursorError> for TagError {
    fn from(e: CursorError) -> Self {
        TagError::MalformedFile(e.to_string())
    }
}
