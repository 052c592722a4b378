// SPDX-License-Identifier: MIT
//
// keytrace — echo decoded key events until Ctrl-Q.
//
// The smallest useful exercise of raw mode plus the key decoder: turn
// the line discipline off, decode one key at a time, print what
// arrived. Printable keys show as `code ('c')`, control keys as their
// bare code, named keys (arrows, pages, escape) by name. Lines end in
// `\r\n` because output post-processing is off too.
//
// Usage:
//   cargo run -p callisto-term --example keytrace

use std::io;

use callisto_term::input::{Key, TtyInput, ctrl, read_key};
use callisto_term::terminal::RawMode;

fn main() -> io::Result<()> {
    let mut raw = RawMode::new();
    raw.enable()?;

    let mut input = TtyInput::new();
    loop {
        match read_key(&mut input)? {
            Key::Ctrl(code) if code == ctrl(b'q') => break,
            Key::Char(byte) => print!("{byte} ('{}')\r\n", char::from(byte)),
            Key::Ctrl(code) => print!("{code}\r\n"),
            named => print!("{named:?}\r\n"),
        }
    }

    raw.disable()
}
