// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, size detection, and guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and one raw fd write in the
// panic hook. These are the standard POSIX interfaces for terminal
// control; there is no safe alternative. Each unsafe block is minimal
// and documented.
#![allow(unsafe_code)]
//
// This module owns the terminal's line discipline. [`RawMode`] snapshots
// the termios state, applies the raw configuration (byte-at-a-time reads
// with a ~100ms idle timeout, no echo, no signals, no output post-
// processing), and guarantees the snapshot comes back on every exit
// path: explicit disable, drop, or panic.
//
// The panic hook deserves special mention: it bypasses Rust's stdout
// lock entirely, writing a pre-built restore sequence directly to fd 1.
// This prevents deadlock if the panic happened while the lock was held
// (mid-frame flush). One raw write, termios restored from a global
// backup, then the original panic handler prints its message to a
// working terminal.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::frame::Frame;
use crate::input::ByteSource;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
///
/// Both dimensions are non-zero everywhere a `Size` is handed out;
/// [`window_size`] and [`detect_size`] reject degenerate reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ────────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// driver reports a zero dimension (some historically do).
#[cfg(unix)]
#[must_use]
pub fn window_size() -> Option<Size> {
    // SAFETY: TIOCGWINSZ fills a winsize struct; a zeroed one is a valid
    // out-parameter.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn window_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ─────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// The [`RawMode`] handle owns its own copy, but the panic hook can't
/// reach it. This global backup, behind a [`Mutex`] rather than
/// `static mut`, lets the hook restore the line discipline without the
/// handle.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            // SAFETY: restoring a termios struct we previously read.
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Screen restore sequence for emergency use: clear, home, show cursor.
///
/// Ordered so the panic message lands at the top of a blank screen with
/// a visible cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's
/// stdout lock to avoid deadlock), restores termios, then delegates to
/// the original panic handler so the error prints to a working terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
///
/// Bypasses Rust's `io::stdout()` lock to avoid deadlocking if the panic
/// occurred while the lock was held (e.g., mid-frame flush).
fn emergency_restore() {
    #[cfg(unix)]
    // SAFETY: writing a static byte string to fd 1.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Raw Mode ────────────────────────────────────────────────────────────────

/// How long a raw-mode read waits before returning "no data", in tenths
/// of a second (the termios VTIME unit).
///
/// One decisecond: short enough that resolving a lone Escape press feels
/// instant, long enough that an arrow-key sequence is never split by it
/// at any realistic line speed.
pub const READ_TIMEOUT_DECISECONDS: u8 = 1;

/// Raw-mode handle with guaranteed restore.
///
/// [`enable`](Self::enable) snapshots the current termios settings and
/// applies the raw configuration; [`disable`](Self::disable) — or
/// dropping the handle, or a panic — puts the snapshot back verbatim.
pub struct RawMode {
    /// Termios saved before raw mode was applied; present exactly while
    /// a restore is pending.
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Create a handle. Raw mode is not touched until [`enable`](Self::enable).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original: None,
        }
    }

    /// Whether the handle holds a snapshot it will restore.
    #[cfg(unix)]
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.original.is_some()
    }

    #[cfg(not(unix))]
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        false
    }

    /// Snapshot the current line discipline and switch to raw mode.
    ///
    /// Idempotent: enabling while already enabled is a no-op, and the
    /// first snapshot is the one that gets restored. Also installs the
    /// panic hook (once per process) so a crash can't strand the
    /// terminal in raw mode.
    ///
    /// # Errors
    ///
    /// Fails when stdin is not a terminal or the settings cannot be
    /// applied. The editor cannot run with an indeterminate line
    /// discipline, so callers treat this as fatal.
    #[cfg(unix)]
    pub fn enable(&mut self) -> io::Result<()> {
        if self.original.is_some() {
            return Ok(());
        }

        install_panic_hook();

        let original = read_termios()?;
        self.original = Some(original);

        // Also save to the global backup for the panic hook.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }

        let mut termios = original;
        apply_raw_flags(&mut termios);

        // TCSAFLUSH: let pending output drain and drop unread input
        // before the new discipline takes effect.
        // SAFETY: applying a termios struct derived from a valid read.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) } != 0
        {
            // The snapshot stays: drop will still attempt a restore.
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enable(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    /// Reapply the snapshot taken by [`enable`](Self::enable).
    ///
    /// Idempotent: disabling while already disabled is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the saved settings cannot be applied; the snapshot is
    /// kept so a later attempt (or drop) can retry.
    #[cfg(unix)]
    pub fn disable(&mut self) -> io::Result<()> {
        let Some(original) = self.original else {
            return Ok(());
        };

        // TCSAFLUSH again: drain what we queued, discard whatever was
        // typed into the dying raw session.
        // SAFETY: restoring the termios struct read in enable().
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0
        {
            return Err(io::Error::last_os_error());
        }

        // Restored successfully; the panic hook no longer needs it.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        self.original = None;

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn disable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for RawMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // Best effort: the drop path has nowhere to report a failure.
        let _ = self.disable();
    }
}

/// Read the current termios settings for stdin.
#[cfg(unix)]
fn read_termios() -> io::Result<libc::termios> {
    // SAFETY: tcgetattr fills the struct; a zeroed one is a valid
    // out-parameter.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

/// Apply the raw-mode configuration to a termios snapshot.
#[cfg(unix)]
fn apply_raw_flags(termios: &mut libc::termios) {
    // Input: no Ctrl-S/Q flow control, no CR→NL rewriting (Ctrl-M must
    // arrive as 13, not 10), no break-to-SIGINT, no parity checking, no
    // eighth-bit stripping.
    termios.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
    // Output: no post-processing. "\n" stays "\n"; rows end in an
    // explicit "\r\n" from now on.
    termios.c_oflag &= !libc::OPOST;
    // 8-bit characters.
    termios.c_cflag |= libc::CS8;
    // Local: no echo, no line buffering, no signal keys, no Ctrl-V
    // literal-next.
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
    // Bounded reads: return as soon as one byte is available, or with
    // nothing after the idle timeout.
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
}

// ─── Size Detection ──────────────────────────────────────────────────────────

/// Longest cursor-position report the fallback probe will read.
///
/// `ESC [ rows ; cols R` tops out far below this; the cap keeps a
/// terminal that answers with garbage from stalling startup one idle
/// timeout at a time.
const CURSOR_REPORT_MAX: usize = 32;

/// Determine the terminal size, preferring the direct OS query.
///
/// Primary path: `ioctl(TIOCGWINSZ)`. When that fails, fall back to
/// asking the terminal itself: push the cursor toward the bottom-right
/// corner with oversized relative moves (the terminal clamps them at
/// its real edge), request a cursor-position report, and parse the
/// reply that arrives on the input stream. Requires raw mode, so the
/// reply comes through unbuffered and unechoed.
///
/// # Errors
///
/// Fails when the probe's write fails or neither path produces two
/// non-zero dimensions. Without a size no screen layout is possible,
/// so callers treat this as fatal.
pub fn detect_size<I, W>(input: &mut I, out: &mut W) -> io::Result<Size>
where
    I: ByteSource,
    W: Write,
{
    if let Some(size) = window_size() {
        return Ok(size);
    }
    probe_size(input, out)
}

/// The escape-based fallback: move far, ask, read the report.
fn probe_size<I, W>(input: &mut I, out: &mut W) -> io::Result<Size>
where
    I: ByteSource,
    W: Write,
{
    // One write for the whole probe. `C` and `B` stop at the screen
    // edge, unlike `H`, which some terminals would happily park
    // off-screen.
    let mut probe = Frame::new();
    ansi::cursor_right(&mut probe, 999)?;
    ansi::cursor_down(&mut probe, 999)?;
    ansi::query_cursor_position(&mut probe)?;
    probe.flush_to(out)?;

    // The reply arrives as `ESC [ rows ; cols R`. Stop at the
    // terminator, the length cap, or the first idle timeout (a reply
    // that stalls mid-way is never going to complete).
    let mut report = Vec::with_capacity(CURSOR_REPORT_MAX);
    while report.len() < CURSOR_REPORT_MAX {
        let Some(byte) = input.read_byte()? else {
            break;
        };
        report.push(byte);
        if byte == b'R' {
            break;
        }
    }

    parse_cursor_report(&report).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal did not report its size",
        )
    })
}

/// Parse a cursor-position report: `ESC [ rows ; cols R`.
///
/// Both framing bytes are checked before the numbers; a missing
/// terminator, a malformed number, or a zero dimension rejects the
/// whole report.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let rest = report.strip_prefix(b"\x1b[")?;
    let (rows, rest) = parse_u16(rest)?;
    let rest = rest.strip_prefix(b";")?;
    let (cols, rest) = parse_u16(rest)?;
    if rest.first() != Some(&b'R') {
        return None;
    }

    if rows == 0 || cols == 0 {
        return None;
    }
    Some(Size { cols, rows })
}

/// Parse a decimal number prefix, saturating at `u16::MAX`.
///
/// Returns the value and the unconsumed tail; `None` when the slice
/// does not start with a digit.
fn parse_u16(buf: &[u8]) -> Option<(u16, &[u8])> {
    let mut value: u16 = 0;
    let mut len = 0;
    while len < buf.len() && buf[len].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(u16::from(buf[len] - b'0'));
        len += 1;
    }
    if len == 0 {
        return None;
    }
    Some((value, &buf[len..]))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted input: replays bytes, then reports idle timeouts.
    struct Script(VecDeque<u8>);

    impl Script {
        fn bytes(data: &[u8]) -> Self {
            Self(data.iter().copied().collect())
        }
    }

    impl ByteSource for Script {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front())
        }
    }

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn size_equality() {
        assert_eq!(Size { cols: 80, rows: 24 }, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn size_inequality() {
        assert_ne!(Size { cols: 80, rows: 24 }, Size { cols: 120, rows: 40 });
    }

    #[test]
    fn size_is_copy() {
        let a = Size { cols: 80, rows: 24 };
        let b = a;
        assert_eq!(a, b);
    }

    // ── Terminal queries ─────────────────────────────────────────────

    #[test]
    fn window_size_does_not_panic() {
        let _ = window_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_is_valid_utf8() {
        std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
    }

    #[test]
    fn emergency_restore_clears_then_homes() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[2J\x1b[H"));
    }

    #[test]
    fn emergency_restore_shows_cursor_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.ends_with("\x1b[?25h"));
    }

    // ── Raw flag application ────────────────────────────────────────

    #[test]
    #[cfg(unix)]
    fn raw_flags_clear_the_cooked_mode_bits() {
        // SAFETY: zeroed termios is a valid value for flag arithmetic.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        termios.c_iflag = libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP;
        termios.c_oflag = libc::OPOST;
        termios.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN;

        apply_raw_flags(&mut termios);

        assert_eq!(termios.c_iflag, 0);
        assert_eq!(termios.c_oflag, 0);
        assert_eq!(termios.c_lflag, 0);
        assert_eq!(termios.c_cflag & libc::CS8, libc::CS8);
    }

    #[test]
    #[cfg(unix)]
    fn raw_flags_set_bounded_reads() {
        // SAFETY: zeroed termios is a valid value for flag arithmetic.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        apply_raw_flags(&mut termios);

        assert_eq!(termios.c_cc[libc::VMIN], 0);
        assert_eq!(termios.c_cc[libc::VTIME], READ_TIMEOUT_DECISECONDS);
    }

    #[test]
    #[cfg(unix)]
    fn raw_flags_preserve_unrelated_bits() {
        // SAFETY: zeroed termios is a valid value for flag arithmetic.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        termios.c_iflag = libc::IXON | libc::IGNPAR;
        apply_raw_flags(&mut termios);
        assert_eq!(termios.c_iflag, libc::IGNPAR);
    }

    // ── RawMode lifecycle ───────────────────────────────────────────

    #[test]
    fn raw_mode_starts_disabled() {
        let raw = RawMode::new();
        assert!(!raw.is_enabled());
    }

    #[test]
    fn raw_mode_disable_without_enable_is_noop() {
        let mut raw = RawMode::new();
        raw.disable().unwrap();
        assert!(!raw.is_enabled());
    }

    #[test]
    #[cfg(unix)]
    fn raw_mode_enable_fails_off_tty() {
        if is_tty() {
            return; // needs a non-terminal stdin
        }
        let mut raw = RawMode::new();
        assert!(raw.enable().is_err());
        assert!(!raw.is_enabled());
    }

    #[test]
    #[cfg(unix)]
    fn raw_mode_round_trip_restores_termios() {
        if !is_tty() {
            return; // needs a real terminal
        }
        let before = read_termios().unwrap();

        let mut raw = RawMode::new();
        raw.enable().unwrap();
        assert!(raw.is_enabled());

        // Echo really is off while enabled.
        let live = read_termios().unwrap();
        assert_eq!(live.c_lflag & libc::ECHO, 0);

        raw.disable().unwrap();
        assert!(!raw.is_enabled());

        let after = read_termios().unwrap();
        assert_eq!(before.c_iflag, after.c_iflag);
        assert_eq!(before.c_oflag, after.c_oflag);
        assert_eq!(before.c_cflag, after.c_cflag);
        assert_eq!(before.c_lflag, after.c_lflag);
        assert_eq!(before.c_cc, after.c_cc);
    }

    #[test]
    #[cfg(unix)]
    fn raw_mode_double_enable_keeps_first_snapshot() {
        if !is_tty() {
            return; // needs a real terminal
        }
        let before = read_termios().unwrap();

        let mut raw = RawMode::new();
        raw.enable().unwrap();
        // A second enable must not re-snapshot the (now raw) settings.
        raw.enable().unwrap();
        raw.disable().unwrap();

        let after = read_termios().unwrap();
        assert_eq!(before.c_lflag, after.c_lflag);
    }

    #[test]
    #[cfg(unix)]
    fn raw_mode_drop_restores() {
        if !is_tty() {
            return; // needs a real terminal
        }
        let before = read_termios().unwrap();

        {
            let mut raw = RawMode::new();
            raw.enable().unwrap();
        }

        let after = read_termios().unwrap();
        assert_eq!(before.c_lflag, after.c_lflag);
    }

    // ── Cursor-report parsing ───────────────────────────────────────

    #[test]
    fn parse_report_basic() {
        assert_eq!(
            parse_cursor_report(b"\x1b[40;120R"),
            Some(Size {
                cols: 120,
                rows: 40
            })
        );
    }

    #[test]
    fn parse_report_single_digits() {
        assert_eq!(
            parse_cursor_report(b"\x1b[5;9R"),
            Some(Size { cols: 9, rows: 5 })
        );
    }

    #[test]
    fn parse_report_rows_come_first() {
        let size = parse_cursor_report(b"\x1b[24;80R").unwrap();
        assert_eq!(size.rows, 24);
        assert_eq!(size.cols, 80);
    }

    #[test]
    fn parse_report_rejects_missing_escape() {
        assert_eq!(parse_cursor_report(b"[40;120R"), None);
    }

    #[test]
    fn parse_report_rejects_missing_bracket() {
        assert_eq!(parse_cursor_report(b"\x1b40;120R"), None);
    }

    #[test]
    fn parse_report_rejects_missing_semicolon() {
        assert_eq!(parse_cursor_report(b"\x1b[40120R"), None);
    }

    #[test]
    fn parse_report_rejects_missing_terminator() {
        assert_eq!(parse_cursor_report(b"\x1b[40;120"), None);
    }

    #[test]
    fn parse_report_rejects_wrong_terminator() {
        assert_eq!(parse_cursor_report(b"\x1b[40;120q"), None);
    }

    #[test]
    fn parse_report_rejects_non_numeric_rows() {
        assert_eq!(parse_cursor_report(b"\x1b[ab;120R"), None);
    }

    #[test]
    fn parse_report_rejects_zero_rows() {
        assert_eq!(parse_cursor_report(b"\x1b[0;120R"), None);
    }

    #[test]
    fn parse_report_rejects_zero_cols() {
        assert_eq!(parse_cursor_report(b"\x1b[40;0R"), None);
    }

    #[test]
    fn parse_report_rejects_empty() {
        assert_eq!(parse_cursor_report(b""), None);
    }

    #[test]
    fn parse_report_saturates_huge_numbers() {
        let size = parse_cursor_report(b"\x1b[99999;99999R").unwrap();
        assert_eq!(size.rows, u16::MAX);
        assert_eq!(size.cols, u16::MAX);
    }

    // ── Fallback probe ──────────────────────────────────────────────

    #[test]
    fn probe_emits_the_probe_sequence() {
        let mut sink = Vec::new();
        let mut input = Script::bytes(b"\x1b[40;120R");
        let size = probe_size(&mut input, &mut sink).unwrap();

        assert_eq!(sink, b"\x1b[999C\x1b[999B\x1b[6n");
        assert_eq!(
            size,
            Size {
                cols: 120,
                rows: 40
            }
        );
    }

    #[test]
    fn probe_fails_when_the_reply_never_comes() {
        let mut sink = Vec::new();
        let mut input = Script::bytes(b"");
        let err = probe_size(&mut input, &mut sink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn probe_fails_on_a_stalled_reply() {
        let mut sink = Vec::new();
        let mut input = Script::bytes(b"\x1b[40;1");
        assert!(probe_size(&mut input, &mut sink).is_err());
    }

    #[test]
    fn probe_fails_on_garbage() {
        let mut sink = Vec::new();
        let mut input = Script::bytes(b"not a report R");
        assert!(probe_size(&mut input, &mut sink).is_err());
    }

    #[test]
    fn probe_stops_reading_at_the_terminator() {
        let mut sink = Vec::new();
        let mut input = Script::bytes(b"\x1b[40;120Rxyz");
        probe_size(&mut input, &mut sink).unwrap();
        // Whatever follows the report is someone else's input.
        assert_eq!(input.0.len(), 3);
    }

    #[test]
    fn probe_gives_up_at_the_length_cap() {
        let mut sink = Vec::new();
        let endless = vec![b'1'; CURSOR_REPORT_MAX + 8];
        let mut input = Script::bytes(&endless);
        assert!(probe_size(&mut input, &mut sink).is_err());
        assert_eq!(input.0.len(), 8);
    }

    // ── detect_size ─────────────────────────────────────────────────

    #[test]
    fn detect_size_prefers_the_ioctl() {
        // Only meaningful where the ioctl path works.
        let Some(expected) = window_size() else {
            return;
        };
        let mut sink = Vec::new();
        let size = detect_size(&mut Script::bytes(b""), &mut sink).unwrap();
        assert_eq!(size, expected);
        assert!(sink.is_empty(), "no probe bytes when the ioctl succeeds");
    }

    #[test]
    fn detect_size_falls_back_to_the_probe() {
        // Only meaningful where the ioctl path fails.
        if window_size().is_some() {
            return;
        }
        let mut sink = Vec::new();
        let size = detect_size(&mut Script::bytes(b"\x1b[40;120R"), &mut sink).unwrap();
        assert_eq!(
            size,
            Size {
                cols: 120,
                rows: 40
            }
        );
        assert_eq!(sink, b"\x1b[999C\x1b[999B\x1b[6n");
    }
}
