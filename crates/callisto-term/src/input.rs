// SPDX-License-Identifier: MIT
//
// Key input: raw bytes in, decoded key events out.
//
// Safety: `TtyInput` calls `libc::read` on the stdin descriptor. Raw
// mode hands us a byte stream with no line discipline in the way, and
// POSIX read is the interface for draining it; the single unsafe block
// is minimal and documented.
#![allow(unsafe_code)]
//
// The decoder leans on the raw-mode read timeout instead of a terminfo
// database. A lone 0x1B could be the Escape key or the start of an
// arrow-key sequence; the only way to tell the two apart is to wait
// briefly for follow-up bytes. Raw mode configures every read to return
// after at most one byte or ~100ms of idle (VMIN=0, VTIME=1), so "no
// byte arrived" is an answer the decoder can act on: the ESC stood
// alone.
//
// One `read_key` call yields one complete event. There is no buffer
// between calls; every byte is consumed the moment it is read, and
// sequences the decoder does not recognize collapse to `Key::Escape`
// rather than erroring. Terminals emit more sequences than any table
// anticipates, and a stray unknown key must never kill the session.

use std::io;

// ─── Key events ──────────────────────────────────────────────────────────────

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable byte: 0x20..=0x7E, plus high bytes passed through.
    Char(u8),
    /// A control code (below 0x20, or 0x7F), carried in masked form.
    Ctrl(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    /// A bare Escape press, or a sequence the decoder gave up on.
    Escape,
}

/// Mask a letter down to its control code.
///
/// `ctrl(b'q')` is the byte the terminal sends for Ctrl-Q (0x11). The
/// mask clears the top three bits, so upper- and lower-case letters map
/// to the same code, exactly as the terminal does it.
#[inline]
#[must_use]
pub const fn ctrl(byte: u8) -> u8 {
    byte & 0x1f
}

// ─── Byte source ─────────────────────────────────────────────────────────────

/// A source of input bytes with a bounded read.
///
/// `Ok(None)` means the idle timeout expired with nothing to read. That
/// is not an error: the timeout is what lets the decoder resolve a lone
/// Escape, and what keeps the input loop from blocking forever.
pub trait ByteSource {
    /// Read one byte, waiting at most the idle timeout.
    ///
    /// # Errors
    ///
    /// Returns an error only for genuine I/O failure. "Nothing arrived
    /// yet" is `Ok(None)`, never an error.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// The real terminal: bounded single-byte reads on stdin.
///
/// Relies on raw mode having set `VMIN = 0, VTIME = 1`; without it the
/// reads block indefinitely and echo stays on.
#[derive(Debug, Default)]
pub struct TtyInput;

impl TtyInput {
    /// A byte source over the process's stdin.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for TtyInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            // SAFETY: reading 1 byte into a valid 1-byte buffer.
            let n = unsafe {
                libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast::<libc::c_void>(), 1)
            };
            return match n {
                1 => Ok(Some(buf[0])),
                // VTIME expired with no input.
                0 => Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    match err.raw_os_error() {
                        // Some platforms report the timeout as EAGAIN.
                        Some(libc::EAGAIN) => Ok(None),
                        // A signal interrupted the read; it produced
                        // neither a byte nor a timeout, so go again.
                        Some(libc::EINTR) => continue,
                        _ => Err(err),
                    }
                }
            };
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for TtyInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        // No termios, no timeout: plain blocking reads. EOF is fatal
        // here because a blocking source can never time out of it.
        let mut buf = [0u8; 1];
        match io::stdin().lock().read(&mut buf)? {
            0 => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            _ => Ok(Some(buf[0])),
        }
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1b;

/// Block until the next complete key event.
///
/// Waits out idle timeouts until a byte arrives, then resolves escape
/// sequences with up to two more bounded reads (three for the
/// tilde-terminated forms):
///
/// ```text
/// ESC [ A/B/C/D   → ArrowUp / ArrowDown / ArrowRight / ArrowLeft
/// ESC [ 5 ~       → PageUp
/// ESC [ 6 ~       → PageDown
/// ESC + timeout, or anything unrecognized → Escape
/// byte < 0x20 or byte == 0x7F             → Ctrl(byte)
/// anything else                           → Char(byte)
/// ```
///
/// # Errors
///
/// Propagates genuine I/O failure from the source. Idle timeouts are
/// retried, not reported.
pub fn read_key(source: &mut impl ByteSource) -> io::Result<Key> {
    let byte = loop {
        if let Some(byte) = source.read_byte()? {
            break byte;
        }
    };

    if byte == ESC {
        return decode_escape(source);
    }
    Ok(classify(byte))
}

/// Resolve what follows an ESC byte.
///
/// Both follow-up reads are bounded by the idle timeout. A timeout at
/// any point means the sequence cannot be completed, so the ESC stands
/// alone; a real Escape press and a sequence split by a slow line are
/// indistinguishable here, and both yield `Key::Escape`.
fn decode_escape(source: &mut impl ByteSource) -> io::Result<Key> {
    let Some(first) = source.read_byte()? else {
        return Ok(Key::Escape);
    };
    let Some(second) = source.read_byte()? else {
        return Ok(Key::Escape);
    };

    // Only CSI sequences are recognized. The non-CSI follow-ups stay
    // consumed either way; replaying them as keys would be worse than
    // dropping them.
    if first != b'[' {
        return Ok(Key::Escape);
    }

    let key = match second {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        digit @ b'0'..=b'9' => {
            // Tilde-terminated form: ESC [ <digit> ~
            let Some(terminator) = source.read_byte()? else {
                return Ok(Key::Escape);
            };
            match (digit, terminator) {
                (b'5', b'~') => Key::PageUp,
                (b'6', b'~') => Key::PageDown,
                _ => Key::Escape,
            }
        }
        _ => Key::Escape,
    };
    Ok(key)
}

/// Classify a single non-escape byte.
const fn classify(byte: u8) -> Key {
    if byte < 0x20 || byte == 0x7f {
        Key::Ctrl(byte)
    } else {
        Key::Char(byte)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
