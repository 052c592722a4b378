// SPDX-License-Identifier: MIT
//
// callisto — a terminal text editor, at the stage before text.
//
// This is the main binary that wires the callisto-term crate into a
// running program:
//
//   callisto-term → raw mode, size detection, key decoding,
//                   single-write frames, event loop
//
// The Editor struct implements callisto-term's App trait, connecting
// the event loop to the editor's state. Each keypress flows through:
//
//   stdin → read_key → on_key → cursor move (clamped to the screen)
//   cursor → Renderer::render → frame bytes → one write to stdout
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ ~                            │
//   │ ~      <version banner>      │  ← rows / 3
//   │ ~                            │
//   │ ~                            │
//   └──────────────────────────────┘
//
// There is no text buffer yet. The editor draws the tilde column and
// the version banner, keeps its cursor inside the screen bounds, and
// quits on Ctrl-Q. Printable keys are accepted and ignored until a
// later stage gives them a buffer to land in.

use std::io;
use std::process;

use callisto_term::event_loop::{Action, App, EventLoop};
use callisto_term::input::{Key, TtyInput, ctrl};
use callisto_term::render::Renderer;
use callisto_term::terminal::{RawMode, Size, detect_size, is_tty};

/// The control code that exits the editor: Ctrl-Q.
const QUIT: u8 = ctrl(b'q');

// ─── Editor ──────────────────────────────────────────────────────────────────

/// The editor's entire state at this stage: a cursor inside a screen.
///
/// Both coordinates are 0-based cells and stay inside the screen after
/// every move — `cx < size.cols`, `cy < size.rows`. Nothing else owns
/// or mutates them.
struct Editor {
    /// Cursor column.
    cx: u16,
    /// Cursor row.
    cy: u16,
    /// Screen dimensions, detected once at startup.
    size: Size,
}

impl Editor {
    /// An editor with the cursor in the top-left corner.
    const fn new(size: Size) -> Self {
        Self { cx: 0, cy: 0, size }
    }

    /// Move the cursor one cell in the direction of an arrow key.
    ///
    /// Moves clamp at the screen edges: the right edge admits the last
    /// column (`cols - 1`) and no further, and there is no wrapping to
    /// the next line. Non-arrow keys are ignored.
    fn move_cursor(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.cx = self.cx.saturating_sub(1),
            Key::ArrowRight => {
                if self.cx + 1 < self.size.cols {
                    self.cx += 1;
                }
            }
            Key::ArrowUp => self.cy = self.cy.saturating_sub(1),
            Key::ArrowDown => {
                if self.cy + 1 < self.size.rows {
                    self.cy += 1;
                }
            }
            _ => {}
        }
    }

    /// A page jump: the single-row move repeated once per screen row,
    /// clamping at the edge like every individual step.
    fn move_page(&mut self, key: Key) {
        let step = match key {
            Key::PageUp => Key::ArrowUp,
            Key::PageDown => Key::ArrowDown,
            _ => return,
        };
        for _ in 0..self.size.rows {
            self.move_cursor(step);
        }
    }
}

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        match key {
            Key::Ctrl(code) if code == QUIT => Action::Quit,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.move_cursor(key);
                Action::Continue
            }
            Key::PageUp | Key::PageDown => {
                self.move_page(key);
                Action::Continue
            }
            // Reserved for the stage that has a buffer to type into.
            Key::Char(_) | Key::Ctrl(_) | Key::Escape => Action::Continue,
        }
    }

    fn cursor(&self) -> (u16, u16) {
        (self.cx, self.cy)
    }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// The welcome line drawn across the screen until there is a file to show.
fn banner() -> String {
    format!("Callisto editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Set up the terminal, run the session, put the terminal back.
///
/// Raw mode is restored on every way out of this function: the
/// explicit disable covers the normal paths and surfaces restore
/// failures, `Drop` covers the `?` returns, and the panic hook covers
/// crashes.
fn run() -> io::Result<()> {
    if !is_tty() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stdin is not a terminal",
        ));
    }

    let mut raw = RawMode::new();
    raw.enable()?;

    // The size probe reads through the same source as the key decoder,
    // so its reply obeys the same bounded-read discipline.
    let mut input = TtyInput::new();
    let size = detect_size(&mut input, &mut io::stdout())?;

    let mut editor = Editor::new(size);
    let renderer = Renderer::new(size, banner());
    let session = EventLoop::with_io(renderer, input, io::stdout()).run(&mut editor);

    // A session error outranks a restore error.
    let restored = raw.disable();
    session.and(restored)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("callisto: {err}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
