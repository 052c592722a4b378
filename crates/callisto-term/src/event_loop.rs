// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the editor.
//
// One synchronous loop drives everything: draw a frame reflecting the
// application's cursor, block (bounded by the raw-mode read timeout)
// for the next key, hand it to the application, repeat. The application
// answers each key with `Action::Continue` or `Action::Quit`; quit
// clears the screen and returns control to the caller, which owns the
// raw-mode restore.
//
// There are no threads and no tick: with nothing to animate, the only
// reason to wake up is a key, and the decoder's bounded reads already
// keep the blocking honest. One keypress, one frame.
//
// The loop is generic over its byte source and output sink so the whole
// thing runs under test with a scripted source and a captured sink. The
// real wiring (`EventLoop::new`) is stdin and stdout.

use std::io::{self, Write};

use crate::ansi;
use crate::frame::Frame;
use crate::input::{ByteSource, Key, TtyInput, read_key};
use crate::render::Renderer;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// The loop calls [`cursor`](App::cursor) before drawing each frame and
/// [`on_key`](App::on_key) once per decoded key.
///
/// # Example
///
/// ```
/// use callisto_term::event_loop::{Action, App};
/// use callisto_term::input::{Key, ctrl};
///
/// struct Pager {
///     line: u16,
/// }
///
/// impl App for Pager {
///     fn on_key(&mut self, key: Key) -> Action {
///         match key {
///             Key::Ctrl(code) if code == ctrl(b'q') => Action::Quit,
///             Key::ArrowDown => {
///                 self.line += 1;
///                 Action::Continue
///             }
///             _ => Action::Continue,
///         }
///     }
///
///     fn cursor(&self) -> (u16, u16) {
///         (0, self.line)
///     }
/// }
/// ```
pub trait App {
    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Where the terminal cursor belongs, in 0-based screen cells.
    fn cursor(&self) -> (u16, u16);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The render → decode → dispatch loop.
///
/// Call [`run`](Self::run) to enter the loop; it returns when the
/// application signals [`Action::Quit`] or I/O fails. Raw mode must
/// already be on and stays the caller's responsibility, so the terminal
/// is restored no matter how the loop ends.
///
/// # Example
///
/// ```no_run
/// use callisto_term::event_loop::EventLoop;
/// use callisto_term::render::Renderer;
/// use callisto_term::terminal::Size;
/// # use callisto_term::event_loop::{Action, App};
/// # use callisto_term::input::Key;
/// # struct MyApp;
/// # impl App for MyApp {
/// #     fn on_key(&mut self, _key: Key) -> Action { Action::Quit }
/// #     fn cursor(&self) -> (u16, u16) { (0, 0) }
/// # }
///
/// let renderer = Renderer::new(Size { cols: 80, rows: 24 }, "demo");
/// let mut event_loop = EventLoop::new(renderer);
/// event_loop.run(&mut MyApp)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop<I, W> {
    renderer: Renderer,
    input: I,
    out: W,
}

impl EventLoop<TtyInput, io::Stdout> {
    /// An event loop wired to the real terminal: stdin in, stdout out.
    #[must_use]
    pub fn new(renderer: Renderer) -> Self {
        Self::with_io(renderer, TtyInput::new(), io::stdout())
    }
}

impl<I: ByteSource, W: Write> EventLoop<I, W> {
    /// An event loop over explicit input and output, for tests and
    /// embedding.
    #[must_use]
    pub fn with_io(renderer: Renderer, input: I, out: W) -> Self {
        Self {
            renderer,
            input,
            out,
        }
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// Each iteration writes exactly one frame, then decodes exactly one
    /// key. On quit the screen is cleared and the cursor homed in one
    /// final write, so the shell prompt comes back to a clean terminal;
    /// nothing is written after that. On error the screen is left as it
    /// was — the caller restores the line discipline and reports.
    ///
    /// # Errors
    ///
    /// Propagates I/O failure from either the byte source or the sink.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        loop {
            self.renderer.render(app.cursor(), &mut self.out)?;

            let key = read_key(&mut self.input)?;
            if app.on_key(key) == Action::Quit {
                return self.clear_on_quit();
            }
        }
    }

    /// The farewell write: clear everything, home the cursor.
    fn clear_on_quit(&mut self) -> io::Result<()> {
        let mut frame = Frame::new();
        ansi::clear_screen(&mut frame)?;
        ansi::cursor_home(&mut frame)?;
        frame.flush_to(&mut self.out)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
