// SPDX-License-Identifier: MIT
//
// Per-frame output buffering.
//
// A full redraw is many small pieces: hide cursor, home, a tilde and an
// erase sequence per row, the banner, the final cursor move. Written one
// by one they reach the terminal at unpredictable moments and the screen
// tears. `Frame` accumulates all of them in memory so the entire redraw
// leaves the process as a single write() syscall.
//
// A `Frame` lives for exactly one redraw: composed, flushed, discarded.

use std::io::{self, Write};

/// Starting capacity for a frame buffer.
///
/// A redraw costs a handful of bytes per row plus the escape overhead;
/// 4 KB covers a large terminal without reallocation.
const DEFAULT_CAPACITY: usize = 4096;

/// A byte buffer that accumulates one frame's output for a single write.
pub struct Frame {
    buf: Vec<u8>,
}

impl Frame {
    /// Create an empty frame buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Discard the accumulated bytes (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated output to `w` in one call, then discard it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for Frame {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing happens via flush_to().
        Ok(())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
