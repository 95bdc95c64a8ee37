// Bounded, forward-only view over a byte buffer

use thiserror::Error;

use super::encoding::{self, TextEncoding};

/// Raised when a read runs past the end of a view
#[derive(Debug, Error)]
#[error("{label}: needed {needed} bytes but only {available} available")]
pub struct CursorError {
    pub label: &'static str,
    pub needed: usize,
    pub available: usize,
}

/// Length of a sub-view carved from a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLength {
    Exact(usize),
    ToEnd,
}

/// A cursor over a borrowed byte slice.
///
/// Every read advances the position. Sub-views borrow the same buffer and
/// advance the parent past the bytes they cover, so a child can never read
/// outside its parent.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    label: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(label: &'static str, data: &'a [u8]) -> Self {
        ByteCursor { label, data, pos: 0 }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Offset of the next byte, relative to the start of this view
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Byte at `offset` past the current position, without consuming it
    pub fn peek_u8(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        if n > self.remaining() {
            return Err(CursorError {
                label: self.label,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    /// Read a 3-byte big-endian integer
    pub fn read_u24_be(&mut self) -> Result<u32, CursorError> {
        let [a, b, c] = self.take_array()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Read exactly `N` raw bytes
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        self.take_array()
    }

    /// Read `n` bytes as single-byte characters
    pub fn read_ascii(&mut self, n: usize) -> Result<String, CursorError> {
        let bytes = self.take(n)?;
        Ok(encoding_rs::mem::decode_latin1(bytes).into_owned())
    }

    /// Read a string that ends either at an embedded terminator or at the end
    /// of this view. The terminator, if any, is consumed.
    pub fn read_terminated_string(&mut self, encoding: TextEncoding) -> String {
        let (text, consumed) = encoding::decode_terminated(&self.data[self.pos..], encoding);
        self.pos += consumed;
        text
    }

    pub fn read_remaining(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }

    pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
        self.take(n).map(|_| ())
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.data.len();
    }

    /// Carve a view of the next bytes and advance past them.
    ///
    /// Fails if an exact length exceeds what is left in this view.
    pub fn sub_view(
        &mut self,
        label: &'static str,
        length: ViewLength,
    ) -> Result<ByteCursor<'a>, CursorError> {
        let n = match length {
            ViewLength::Exact(n) => n,
            ViewLength::ToEnd => self.remaining(),
        };
        let bytes = self.take(n)?;
        Ok(ByteCursor::new(label, bytes))
    }

    /// Carve a view of at most `n` bytes, shortened to what is left
    pub fn sub_view_clamped(&mut self, label: &'static str, n: usize) -> ByteCursor<'a> {
        let n = n.min(self.remaining());
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        ByteCursor::new(label, bytes)
    }

    /// View of the next `n` bytes without advancing this cursor
    pub fn look_ahead(&self, label: &'static str, n: usize) -> Result<ByteCursor<'a>, CursorError> {
        if n > self.remaining() {
            return Err(CursorError {
                label,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(ByteCursor::new(label, &self.data[self.pos..self.pos + n]))
    }

    /// Scan forward for `marker`, accepting only matches that start before
    /// `horizon` (an offset into this view).
    ///
    /// On success the cursor is left just past the marker and the marker's
    /// offset is returned. On failure the cursor does not move.
    pub fn scan_for_marker(&mut self, marker: &[u8], horizon: usize) -> Option<usize> {
        if marker.is_empty() || horizon == 0 || self.remaining() < marker.len() {
            return None;
        }
        let last_start = (self.data.len() - marker.len()).min(horizon.saturating_sub(1));
        if self.pos > last_start {
            return None;
        }
        let found = self.data[self.pos..last_start + marker.len()]
            .windows(marker.len())
            .position(|w| w == marker)?;
        let offset = self.pos + found;
        self.pos = offset + marker.len();
        Some(offset)
    }
}
