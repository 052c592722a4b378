// SPDX-License-Identifier: MIT
//
// callisto-term — Terminal control for the callisto editor.
//
// Raw-mode input with a bounded read timeout, a key decoder that
// resolves escape sequences by waiting out that timeout instead of
// consulting a capability database, screen-size detection with a
// cursor-report fallback, and whole-screen rendering composed in
// memory and flushed as a single write per frame.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte read from the terminal goes
// through one decoder; every byte sent to it goes through one frame
// buffer. Nothing is written that cannot be restored on the way out.

pub mod ansi;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod render;
pub mod terminal;
