// Metadata field mapping
//
// Both readers fill the same five fields. This module holds the identifier
// tables that decide which ID3v2 frame or MP4 item atom feeds which field:
// - ID3v2: frame IDs, with v2.2 three-character synonyms (TT2, TP1, ...)
// - MP4: iTunes item atoms under moov/udta/meta/ilst (©nam, ©ART, ...)
//
// Frame IDs match case-sensitively. Atom names are compared lower-cased.

use std::fmt;

/// Standard metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Artist,
    Album,
    Year,
    TrackNumber,
}

impl Field {
    /// Get standard field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Year => "year",
            Field::TrackNumber => "trackNumber",
        }
    }

    /// Whether the field holds a number rather than text
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Year | Field::TrackNumber)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format-specific field mappings
pub struct FieldMappings;

impl FieldMappings {
    /// ID3v2 frame IDs and the field each one feeds
    pub const ID3V2_FRAMES: &'static [(&'static str, Field)] = &[
        ("TT2", Field::Title),
        ("TIT1", Field::Title),
        ("TIT2", Field::Title),
        ("TP1", Field::Artist),
        ("TP2", Field::Artist),
        ("TPE1", Field::Artist),
        ("TPE2", Field::Artist),
        ("TAL", Field::Album),
        ("TALB", Field::Album),
        ("TRK", Field::TrackNumber),
        ("TRCK", Field::TrackNumber),
        ("TYE", Field::Year),
        ("TYER", Field::Year),
    ];

    // MP4 iTunes item atoms, lower-cased (© is 0xA9)
    pub const MP4_TITLE: [u8; 4] = *b"\xA9nam";
    pub const MP4_ARTIST: [u8; 4] = *b"\xA9art";
    pub const MP4_ALBUM_ARTIST: [u8; 4] = *b"aart";
    pub const MP4_ALBUM: [u8; 4] = *b"\xA9alb";
    pub const MP4_YEAR: [u8; 4] = *b"\xA9day";
    pub const MP4_TRACK: [u8; 4] = *b"trkn";

    /// Convert an ID3v2 frame ID to a standard field
    pub fn from_id3v2(frame_id: &str) -> Option<Field> {
        Self::ID3V2_FRAMES
            .iter()
            .find(|(id, _)| *id == frame_id)
            .map(|&(_, field)| field)
    }

    /// Convert a lower-cased MP4 item atom name to a standard field
    pub fn from_mp4(name: [u8; 4]) -> Option<Field> {
        match name {
            Self::MP4_TITLE => Some(Field::Title),
            Self::MP4_ARTIST | Self::MP4_ALBUM_ARTIST => Some(Field::Artist),
            Self::MP4_ALBUM => Some(Field::Album),
            Self::MP4_YEAR => Some(Field::Year),
            Self::MP4_TRACK => Some(Field::TrackNumber),
            _ => None,
        }
    }
}

/// Metadata value converter for handling format-specific value formats
pub struct ValueConverter;

impl ValueConverter {
    /// Parse the leading base-10 integer of `text`, keeping it only if positive.
    ///
    /// Surrounding whitespace and anything after the digits are ignored, so
    /// `"7/12"` gives 7 and `"2014-03-01"` gives 2014. Empty, non-numeric,
    /// zero and negative values give `None`. Values are bounded by `u32`, so
    /// anything above `u32::MAX` (4294967295) is treated as absent too.
    pub fn parse_positive(text: &str) -> Option<u32> {
        let text = text.trim();
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let end = digits
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let value: u32 = digits[..end].parse().ok()?;
        if negative || value == 0 {
            return None;
        }
        Some(value)
    }
}
