//! Refreshable terminal output
//!
//! A [`ConsoleSection`] owns a region at the bottom of the terminal and
//! repaints it in place: each paint moves the cursor back up over the
//! previous paint, erases those lines, and writes the new ones. Replacing
//! the prior output is its only side effect.

use chrono::{DateTime, Local};
use std::io::{self, Write};

pub struct ConsoleSection<W: Write> {
    out: W,
    painted_lines: usize,
}

impl<W: Write> ConsoleSection<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            painted_lines: 0,
        }
    }

    /// Replace the previous paint with `lines`.
    pub fn paint(&mut self, lines: &[String]) -> io::Result<()> {
        // Cursor up + erase for every line of the previous paint
        for _ in 0..self.painted_lines {
            write!(self.out, "\x1b[1A\x1b[2K")?;
        }
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        self.painted_lines = lines.len();
        Ok(())
    }
}

/// Footer line stamped with the local time a change was observed
pub fn change_footer(at: DateTime<Local>) -> String {
    format!("Last change observed at {}", at.format("%H:%M:%S"))
}
