// ID3v2 frame headers and text frames

use tracing::trace;

use crate::error::TagResult;
use crate::utils::cursor::ByteCursor;
use crate::utils::encoding::TextEncoding;
use crate::utils::synchsafe;

/// ID3v2 frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: String,
    pub size: u32,
    /// Always 0 for ID3v2.2, which has no flags on the wire
    pub flags: u16,
}

/// What the frame loop found at the current position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStep {
    Frame(FrameHeader),
    /// Zero bytes or a zero size: the rest of the tag is padding
    Padding,
}

/// Frame header layout, fixed by the tag's major version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// 3-char id, 3-byte size, no flags
    V22,
    /// 4-char id, 4-byte plain size, 2-byte flags
    V23,
    /// 4-char id, 4-byte synchsafe size, 2-byte flags
    V24,
}

impl FrameLayout {
    pub fn for_major(major: u8) -> Option<Self> {
        match major {
            2 => Some(FrameLayout::V22),
            3 => Some(FrameLayout::V23),
            4 => Some(FrameLayout::V24),
            _ => None,
        }
    }

    pub fn header_len(self) -> usize {
        match self {
            FrameLayout::V22 => 6,
            FrameLayout::V23 | FrameLayout::V24 => 10,
        }
    }

    /// Read the next frame header from the frame section.
    ///
    /// For v2.3+ a leading zero byte is either the start of padding (when the
    /// next byte is zero too) or a stray byte before a real frame id, which is
    /// dropped. Trailing bytes too short for a header are treated as padding.
    pub fn read_header(self, frames: &mut ByteCursor<'_>) -> TagResult<FrameStep> {
        if self != FrameLayout::V22 && frames.peek_u8(0) == Some(0) {
            if frames.peek_u8(1).unwrap_or(0) == 0 {
                trace!("Encountered a frame header starting with 0x0000");
                return Ok(FrameStep::Padding);
            }
            trace!("Skipping stray zero byte before frame id");
            frames.skip(1)?;
        }

        if frames.remaining() < self.header_len() {
            trace!(remaining = frames.remaining(), "Frame section ends with a partial header");
            return Ok(FrameStep::Padding);
        }

        let header = match self {
            FrameLayout::V22 => FrameHeader {
                id: frames.read_ascii(3)?,
                size: frames.read_u24_be()?,
                flags: 0,
            },
            FrameLayout::V23 => FrameHeader {
                id: frames.read_ascii(4)?,
                size: frames.read_u32_be()?,
                flags: frames.read_u16_be()?,
            },
            FrameLayout::V24 => FrameHeader {
                id: frames.read_ascii(4)?,
                size: synchsafe::decode(frames.read_array()?),
                flags: frames.read_u16_be()?,
            },
        };

        if header.size == 0 {
            trace!(id = %header.id, "Encountered 0-size frame, considering it as padding");
            return Ok(FrameStep::Padding);
        }
        Ok(FrameStep::Frame(header))
    }
}

/// Decode a text frame: one encoding byte, then a string that may or may not
/// be terminated before the end of the frame
pub fn read_text_frame(major: u8, data: &mut ByteCursor<'_>) -> TagResult<String> {
    if !data.has_more() {
        return Ok(String::new());
    }
    let encoding = TextEncoding::for_id3(data.read_u8()?, major)?;
    Ok(data.read_terminated_string(encoding))
}
