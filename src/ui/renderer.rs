/// Presentation layer: writes colorized frames in place.
///
/// How it works:
///   1. `init` parks the cursor at the frame origin and saves that position
///   2. every `draw` restores the saved position and overwrites the frame
///   3. color / bold changes are only emitted when the token changes, and
///      every line ends with a color reset
///   4. all commands are batched with `queue!`, flushed once per frame
///
/// The terminal stays in cooked mode, so Ctrl-C still arrives as SIGINT.
/// `cleanup` (also run on drop) resets colors and shows the cursor again.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo, RestorePosition, SavePosition},
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::domain::color::{ColorToken, StyledBlock};

/// Put the terminal back into a normal state: default colors, visible
/// cursor, output on a fresh line.
pub fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, ResetColor, SetAttribute(Attribute::Reset), cursor::Show, Print("\n"))?;
    out.flush()
}

pub struct Renderer<W: Write> {
    writer: BufWriter<W>,
    active: bool,
}

impl Renderer<io::Stdout> {
    pub fn stdout() -> Self {
        Renderer::new(io::stdout())
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, out),
            active: false,
        }
    }

    pub fn init(&mut self, clear: bool) -> io::Result<()> {
        queue!(self.writer, Print("\r"))?;
        if clear {
            queue!(self.writer, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        queue!(self.writer, SavePosition, cursor::Hide)?;
        self.active = true;
        self.writer.flush()
    }

    pub fn draw(&mut self, frame: &StyledBlock) -> io::Result<()> {
        queue!(self.writer, RestorePosition)?;

        for (row, line) in frame.lines.iter().enumerate() {
            if row > 0 {
                queue!(self.writer, Print("\n"))?;
            }
            let mut current: Option<ColorToken> = None;
            for span in line {
                if current != Some(span.token) {
                    self.apply(span.token)?;
                    current = Some(span.token);
                }
                queue!(self.writer, Print(&span.text))?;
            }
            queue!(self.writer, ResetColor)?;
        }

        self.writer.flush()
    }

    fn apply(&mut self, token: ColorToken) -> io::Result<()> {
        let weight = if token.bold { Attribute::Bold } else { Attribute::NormalIntensity };
        queue!(self.writer, SetAttribute(weight), SetForegroundColor(token.color))
    }

    /// Idempotent; safe to call on every exit path.
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore_terminal(&mut self.writer)
    }

    #[cfg(test)]
    fn output(&mut self) -> &W {
        let _ = self.writer.flush();
        self.writer.get_ref()
    }
}

impl<W: Write> Drop for Renderer<W> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
