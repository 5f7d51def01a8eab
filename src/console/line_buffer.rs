//! Line buffer for console input

use super::parser::MAX_LINE_LEN;

/// Line input buffer
///
/// Holds at most `MAX_LINE_LEN` bytes; the console force-terminates the
/// line once it is full.
pub struct LineBuffer {
    buf: [u8; MAX_LINE_LEN],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_LINE_LEN],
            len: 0,
        }
    }

    /// Push a byte
    ///
    /// Returns `false` (byte dropped) if the buffer is full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < MAX_LINE_LEN {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if full
    pub fn is_full(&self) -> bool {
        self.len == MAX_LINE_LEN
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
