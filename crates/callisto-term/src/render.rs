// SPDX-License-Identifier: MIT
//
// Full-screen frame composition.
//
// The renderer draws the whole screen into a `Frame` and flushes it as
// one write: hide the cursor, go home, draw every row, park the cursor,
// show it again. The terminal never gets to display a half-drawn state,
// which is what keeps the redraw flicker-free without any diffing.
//
// There is no text buffer yet. Rows are tilde placeholders (the column
// of `~` marks the void beyond the end of a file) and the only content
// is a banner line, centered a third of the way down. Centering is
// measured in display columns, not bytes, so a double-width character
// in the banner counts as two.

use std::io::{self, Write};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ansi;
use crate::frame::Frame;
use crate::terminal::Size;

/// Composes one full-screen frame per cursor state.
pub struct Renderer {
    size: Size,
    title: String,
}

impl Renderer {
    /// A renderer for a fixed screen size and banner line.
    #[must_use]
    pub fn new(size: Size, title: impl Into<String>) -> Self {
        Self {
            size,
            title: title.into(),
        }
    }

    /// Build the complete frame for one cursor position.
    ///
    /// Composition is separate from flushing so tests can compare frames
    /// byte for byte. Layout, in emission order: hide cursor, home, the
    /// rows (each erased to end of line, `\r\n` between rows but not
    /// after the last, which would scroll), cursor parked at `cursor`
    /// (0-based; the emitter does the wire's 1-based conversion), show
    /// cursor.
    ///
    /// # Errors
    ///
    /// Propagated from the frame writes; a [`Frame`] never actually
    /// fails them.
    pub fn compose(&self, cursor: (u16, u16)) -> io::Result<Frame> {
        let mut frame = Frame::new();

        ansi::cursor_hide(&mut frame)?;
        ansi::cursor_home(&mut frame)?;

        self.draw_rows(&mut frame)?;

        ansi::cursor_to(&mut frame, cursor.0, cursor.1)?;
        ansi::cursor_show(&mut frame)?;

        Ok(frame)
    }

    /// Compose and flush one frame as a single write.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to `out` fails.
    pub fn render(&self, cursor: (u16, u16), out: &mut impl Write) -> io::Result<()> {
        self.compose(cursor)?.flush_to(out)
    }

    /// Draw every screen row.
    fn draw_rows(&self, frame: &mut Frame) -> io::Result<()> {
        for y in 0..self.size.rows {
            if y == self.banner_row() {
                frame.write_all(self.banner_line().as_bytes())?;
            } else {
                frame.write_all(b"~")?;
            }

            // Erase whatever the previous frame left on this row.
            ansi::clear_to_eol(frame)?;

            if y + 1 < self.size.rows {
                frame.write_all(b"\r\n")?;
            }
        }
        Ok(())
    }

    /// The row the banner lands on: a third of the way down.
    const fn banner_row(&self) -> u16 {
        self.size.rows / 3
    }

    /// Lay out the banner row: the title truncated to the screen width
    /// and centered. The left padding opens with the row's `~` (spaces
    /// for the rest), and is dropped entirely when the title already
    /// fills the row.
    fn banner_line(&self) -> String {
        let cols = usize::from(self.size.cols);
        let text = truncate_to_width(&self.title, cols);

        let padding = (cols - text.width()) / 2;
        let mut line = String::with_capacity(cols + text.len());
        if padding > 0 {
            line.push('~');
            for _ in 1..padding {
                line.push(' ');
            }
        }
        line.push_str(text);
        line
    }
}

/// Truncate a string to at most `max` display columns without splitting
/// a grapheme cluster: a double-width character either fits whole or is
/// dropped whole.
fn truncate_to_width(s: &str, max: usize) -> &str {
    let mut width = 0;
    let mut end = 0;
    for (idx, grapheme) in s.grapheme_indices(true) {
        let grapheme_width = grapheme.width();
        if width + grapheme_width > max {
            break;
        }
        width += grapheme_width;
        end = idx + grapheme.len();
    }
    &s[..end]
}

// ─── Tests ───────────────────────────────────────────────────────────────────
