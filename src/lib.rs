//! tagscope - reads title, artist, album, year and track number from
//! ID3v2 (MP3) and MP4/M4A files.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

pub mod error;
pub mod field_mapping;
pub mod id3;
pub mod mp4;
pub mod options;
pub mod tag;
pub mod utils;

#[cfg(feature = "python")]
mod python;

pub use error::{TagError, TagResult};
pub use field_mapping::Field;
pub use id3::Id3Reader;
pub use mp4::Mp4Reader;
pub use options::ReadOptions;
pub use tag::Tag;

/// Tag format of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    Id3v2,
    Mp4,
    Unknown,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Id3v2 => "ID3v2",
            FileType::Mp4 => "MP4",
            FileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// An audio file and its detected tag format
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub file_type: FileType,
    options: ReadOptions,
}

impl AudioFile {
    /// Open `path` and detect its format with default options
    pub fn new(path: impl Into<PathBuf>) -> TagResult<Self> {
        Self::with_options(path, ReadOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: ReadOptions) -> TagResult<Self> {
        let path = path.into();
        let file_type = Self::detect_file_type(&path)?;
        debug!(path = %path.display(), %file_type, "Detected file type");
        Ok(AudioFile {
            path,
            file_type,
            options,
        })
    }

    /// Detect the format from the leading bytes, then from the extension
    pub fn detect_file_type(path: &Path) -> TagResult<FileType> {
        let mut file = File::open(path)?;
        let mut signature = Vec::with_capacity(8);
        file.by_ref().take(8).read_to_end(&mut signature)?;

        if signature.starts_with(id3::Id3v2Header::MARKER) {
            return Ok(FileType::Id3v2);
        }
        if signature.get(4..8) == Some(mp4::FourCC::FTYP.as_bytes().as_slice()) {
            return Ok(FileType::Mp4);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        Ok(match extension.as_deref() {
            Some("mp3") => FileType::Id3v2,
            Some("m4a" | "m4b" | "m4p" | "mp4") => FileType::Mp4,
            _ => FileType::Unknown,
        })
    }

    /// Read the tag; `None` for ID3 files without a tag and for unknown formats
    pub fn read_tag(&self) -> TagResult<Option<Tag>> {
        match self.file_type {
            FileType::Id3v2 => Id3Reader::new(self.options.clone()).read(&self.path),
            FileType::Mp4 => Mp4Reader::new(self.options.clone())
                .read(&self.path)
                .map(Some),
            FileType::Unknown => Ok(None),
        }
    }
}
