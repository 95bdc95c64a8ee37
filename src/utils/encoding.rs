// Encoding utilities

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};

use crate::error::TagError;

/// Text encodings a frame may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1
    Latin1,
    /// UTF-16 with byte-order mark
    Utf16,
    Utf8,
}

impl TextEncoding {
    /// Map an ID3v2 text-frame encoding byte, which depends on the major version.
    ///
    /// `0` and `1` are valid everywhere, `3` only after ID3v2.2. Everything
    /// else (including the BOM-less UTF-16BE form, `2`) is rejected.
    pub fn for_id3(byte: u8, major: u8) -> Result<Self, TagError> {
        match (byte, major) {
            (0, _) => Ok(TextEncoding::Latin1),
            (1, _) => Ok(TextEncoding::Utf16),
            (3, m) if m > 2 => Ok(TextEncoding::Utf8),
            _ => Err(TagError::UnsupportedEncoding {
                encoding: byte,
                major,
            }),
        }
    }

    fn unit_len(self) -> usize {
        match self {
            TextEncoding::Utf16 => 2,
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
        }
    }
}

/// Decode a string that stops at the first terminator, or at the end of
/// `data` when there is none.
///
/// Returns the text and the number of bytes consumed, terminator included.
pub fn decode_terminated(data: &[u8], encoding: TextEncoding) -> (String, usize) {
    let unit = encoding.unit_len();
    let terminator = data
        .chunks_exact(unit)
        .position(|c| c.iter().all(|&b| b == 0));

    let (body, consumed) = match terminator {
        Some(index) => (&data[..index * unit], index * unit + unit),
        // a dangling odd byte of UTF-16 is dropped
        None => (&data[..data.len() - data.len() % unit], data.len()),
    };

    (decode_text(body, encoding), consumed)
}

/// Decode text with specified encoding
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Latin1 => encoding_rs::mem::decode_latin1(data).into_owned(),
        TextEncoding::Utf16 => {
            // Detect BOM
            if data.starts_with(&[0xFF, 0xFE]) {
                UTF_16LE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else if data.starts_with(&[0xFE, 0xFF]) {
                UTF_16BE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else {
                UTF_16LE.decode_without_bom_handling(data).0.into_owned()
            }
        }
        TextEncoding::Utf8 => UTF_8.decode_with_bom_removal(data).0.into_owned(),
    }
}
