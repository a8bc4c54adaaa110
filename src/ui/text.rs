use std::io::{self, Write};

use compass_level_core::display::Readout;

/// Draws readouts as text lines.
///
/// In inline mode each frame overwrites the previous one with a carriage
/// return, which suits an interactive terminal.
pub struct TextRenderer<W: Write> {
    out: W,
    inline: bool,
    frames: u64,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            inline: false,
            frames: 0,
        }
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Draw one frame: needle angle, cardinal direction and tilt label.
    pub fn render(&mut self, readout: &Readout) -> io::Result<()> {
        let line = format!(
            "Needle: {:6.2}° {:<2} | {}",
            readout.needle_rotation_deg(),
            readout.cardinal(),
            readout.tilt_label()
        );
        if self.inline {
            write!(self.out, "\r{}", line)?;
        } else {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }

    /// End the current inline line, if any.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.inline && self.frames > 0 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
