// ID3v2 tag reader

use std::path::Path;

use tracing::{debug, warn};

use super::frames::{self, FrameLayout, FrameStep};
use crate::error::{TagError, TagResult};
use crate::field_mapping::FieldMappings;
use crate::options::ReadOptions;
use crate::tag::{FieldCandidates, FieldValue, Tag};
use crate::utils::cursor::{ByteCursor, CursorError};
use crate::utils::io::load_file;
use crate::utils::synchsafe;

/// ID3v2 header structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2Header {
    pub major: u8,
    pub minor: u8,
    pub flags: u8,
    pub unsynchronisation: bool,
    /// Only meaningful from v2.3 on
    pub extended_header: bool,
    /// Size of the frame section, excluding the 10-byte tag header
    pub size: u32,
}

impl Id3v2Header {
    pub const MARKER: &'static [u8; 3] = b"ID3";
    /// Bytes following the marker: version (2), flags (1), size (4)
    pub const LEN_AFTER_MARKER: usize = 7;

    /// Parse the header bytes that follow an `ID3` marker.
    ///
    /// Returns `None` unless the bytes match `yy yy xx zz zz zz zz` with a
    /// major version in 2..=4, a minor version below 0xFF and every size
    /// byte below 0x80.
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>, CursorError> {
        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        let flags = cursor.read_u8()?;
        let size_bytes: [u8; 4] = cursor.read_array()?;
        let plausible_size = size_bytes.iter().all(|b| b & 0x80 == 0);
        if !(2..=4).contains(&major) || minor == 0xFF || !plausible_size {
            return Ok(None);
        }
        let size = synchsafe::decode(size_bytes);

        Ok(Some(Id3v2Header {
            major,
            minor,
            flags,
            unsynchronisation: flags & 0x80 != 0,
            extended_header: major >= 3 && flags & 0x40 != 0,
            size,
        }))
    }
}

/// Reads the first supported ID3v2 tag of a file
#[derive(Debug, Clone, Default)]
pub struct Id3Reader {
    options: ReadOptions,
}

impl Id3Reader {
    pub fn new(options: ReadOptions) -> Self {
        Id3Reader { options }
    }

    /// Read the tag of the file at `path`; `Ok(None)` when it has none
    pub fn read(&self, path: impl AsRef<Path>) -> TagResult<Option<Tag>> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Scanning file for ID3 tag");
        let bytes = load_file(path)?;
        self.read_from_bytes(&bytes)
    }

    pub fn read_from_bytes(&self, data: &[u8]) -> TagResult<Option<Tag>> {
        let mut stream = ByteCursor::new("File", data);

        loop {
            let Some(offset) =
                stream.scan_for_marker(Id3v2Header::MARKER, self.options.max_search_offset)
            else {
                debug!("ID3 marker not found");
                return Ok(None);
            };

            let Ok(mut header_view) = stream.look_ahead("Header", Id3v2Header::LEN_AFTER_MARKER)
            else {
                debug!(offset, "ID3 marker too close to end of file");
                return Ok(None);
            };

            let Some(header) = Id3v2Header::parse(&mut header_view)? else {
                debug!(
                    offset,
                    major = data[offset + 3],
                    "ID3 marker without a plausible header. Looking for other tags."
                );
                continue;
            };
            stream.skip(Id3v2Header::LEN_AFTER_MARKER)?;

            if header.extended_header {
                return Err(TagError::UnsupportedFeature(
                    "ID3v2 extended header".to_string(),
                ));
            }
            debug!(offset, ?header, "ID3 tag found");
            return read_frames(&header, &mut stream).map(Some);
        }
    }
}

/// Walk the frame section and build the tag from recognized text frames
fn read_frames(header: &Id3v2Header, stream: &mut ByteCursor<'_>) -> TagResult<Tag> {
    let Some(layout) = FrameLayout::for_major(header.major) else {
        return Err(TagError::MalformedFile(format!(
            "no frame layout for ID3v2.{}",
            header.major
        )));
    };

    let declared = header.size as usize;
    let mut frames = stream.sub_view_clamped("Frames", declared);
    if frames.len() < declared {
        warn!(
            declared,
            available = frames.len(),
            "Tag size exceeds file, frame section clamped"
        );
    }

    let mut candidates = FieldCandidates::new();
    while frames.has_more() {
        let frame = match layout.read_header(&mut frames)? {
            FrameStep::Frame(frame) => frame,
            FrameStep::Padding => {
                frames.skip_to_end();
                break;
            }
        };
        debug!(id = %frame.id, size = frame.size, flags = frame.flags, "Found frame header");

        let mut data = frames.sub_view_clamped("Frame data", frame.size as usize);
        if let Some(field) = FieldMappings::from_id3v2(&frame.id) {
            // a field that is already filled is not decoded again
            if !candidates.is_settled(field) {
                let text = frames::read_text_frame(header.major, &mut data)?;
                candidates.offer(field, FieldValue::Text(text));
            }
        }
        data.skip_to_end();
    }

    Ok(candidates.into_tag())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(major: u8, flags: u8, size: u32) -> Vec<u8> {
        let mut out = b"ID3".to_vec();
        out.extend([major, 0, flags]);
        out.extend(synchsafe::encode(size));
        out
    }

    fn v23_frame(id: &str, payload: &[u8]) -> Vec<u8> {
        let mut out = id.as_bytes().to_vec();
        out.extend((payload.len() as u32).to_be_bytes());
        out.extend([0, 0]);
        out.extend(payload);
        out
    }

    fn v23_tag(frames: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = frames.concat();
        let mut out = header_bytes(3, 0, body.len() as u32);
        out.extend(body);
        out
    }

    #[test]
    fn test_header_parse() {
        let bytes = header_bytes(4, 0xC0, 300);
        let mut cursor = ByteCursor::new("Header", &bytes[3..]);
        let header = Id3v2Header::parse(&mut cursor).unwrap().unwrap();
        assert_eq!(header.major, 4);
        assert!(header.unsynchronisation);
        assert!(header.extended_header);
        assert_eq!(header.size, 300);
    }

    #[test]
    fn test_extended_flag_ignored_for_v22() {
        let bytes = header_bytes(2, 0x40, 0);
        let mut cursor = ByteCursor::new("Header", &bytes[3..]);
        let header = Id3v2Header::parse(&mut cursor).unwrap().unwrap();
        assert!(!header.extended_header);
    }

    #[test]
    fn test_unsupported_versions_rejected() {
        for major in [0u8, 1, 5, 0xFF] {
            let bytes = header_bytes(major, 0, 0);
            let mut cursor = ByteCursor::new("Header", &bytes[3..]);
            assert_eq!(Id3v2Header::parse(&mut cursor).unwrap(), None);
        }
    }

    #[test]
    fn test_implausible_minor_or_size_rejected() {
        for header in [b"\x03\xFF\x00\x00\x00\x00\x10", b"\x03\x00\x00\x00\x00\x80\x10"] {
            let mut cursor = ByteCursor::new("Header", header);
            assert_eq!(Id3v2Header::parse(&mut cursor).unwrap(), None);
        }
    }

    #[test]
    fn test_reads_text_frames() {
        let data = v23_tag(&[
            v23_frame("TIT2", b"\x00Blue Poles"),
            v23_frame("TPE1", b"\x00Smith (Patti)"),
            v23_frame("TALB", b"\x00Peace and Noise\x00"),
            v23_frame("TRCK", b"\x007"),
        ]);
        let tag = Id3Reader::default().read_from_bytes(&data).unwrap().unwrap();
        assert_eq!(tag.title(), "Blue Poles");
        assert_eq!(tag.artist(), "Smith (Patti)");
        assert_eq!(tag.album(), "Peace and Noise");
        assert_eq!(tag.year, None);
        assert_eq!(tag.track_number, Some(7));
    }

    #[test]
    fn test_first_synonym_wins() {
        let data = v23_tag(&[
            v23_frame("TPE2", b"\x00Band"),
            v23_frame("TPE1", b"\x00Soloist"),
        ]);
        let tag = Id3Reader::default().read_from_bytes(&data).unwrap().unwrap();
        assert_eq!(tag.artist(), "Band");
    }

    #[test]
    fn test_settled_field_is_not_decoded_again() {
        // second title uses an invalid encoding but is never decoded
        let data = v23_tag(&[
            v23_frame("TIT2", b"\x00First"),
            v23_frame("TIT2", b"\x09Second"),
        ]);
        let tag = Id3Reader::default().read_from_bytes(&data).unwrap().unwrap();
        assert_eq!(tag.title(), "First");
    }

    #[test]
    fn test_unknown_encoding_fails() {
        let data = v23_tag(&[v23_frame("TALB", b"\x05Album")]);
        assert!(matches!(
            Id3Reader::default().read_from_bytes(&data),
            Err(TagError::UnsupportedEncoding { encoding: 5, major: 3 })
        ));
    }

    #[test]
    fn test_extended_header_fails() {
        let mut data = header_bytes(3, 0x40, 10);
        data.extend([0u8; 10]);
        assert!(matches!(
            Id3Reader::default().read_from_bytes(&data),
            Err(TagError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn test_frame_section_clamped_to_file() {
        let mut data = header_bytes(3, 0, 1000);
        data.extend(v23_frame("TIT2", b"\x00Truncated"));
        let tag = Id3Reader::default().read_from_bytes(&data).unwrap().unwrap();
        assert_eq!(tag.title(), "Truncated");
    }

    #[test]
    fn test_marker_beyond_horizon_is_ignored() {
        let mut data = vec![0xAAu8; 64];
        data.extend(v23_tag(&[v23_frame("TIT2", b"\x00Late")]));
        let reader = Id3Reader::new(ReadOptions::default().with_max_search_offset(64));
        assert_eq!(reader.read_from_bytes(&data).unwrap(), None);

        let reader = Id3Reader::new(ReadOptions::default().with_max_search_offset(65));
        let tag = reader.read_from_bytes(&data).unwrap().unwrap();
        assert_eq!(tag.title(), "Late");
    }

    #[test]
    fn test_marker_at_end_of_file() {
        assert_eq!(Id3Reader::default().read_from_bytes(b"audioID3\x03").unwrap(), None);
    }
}
