use std::io::{self, BufRead, Write};

use flashcards_core::model::content::{Segment, segments};

/// Line-oriented terminal I/O over any reader and writer.
pub(crate) struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub(crate) fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub(crate) fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Print `label`, then read one trimmed line. `None` at end of input.
    pub(crate) fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label} > ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Print card text with fenced code set off from prose.
    pub(crate) fn print_text(&mut self, text: &str, indent: &str) -> io::Result<()> {
        for segment in segments(text) {
            match segment {
                Segment::Text(prose) => {
                    for line in prose.lines() {
                        writeln!(self.out, "{indent}{line}")?;
                    }
                }
                Segment::Code { language, code } => {
                    let label = language.as_deref().unwrap_or("code");
                    writeln!(self.out, "{indent}--- {label} ---")?;
                    for line in code.lines() {
                        writeln!(self.out, "{indent}  {line}")?;
                    }
                    writeln!(self.out, "{indent}---")?;
                }
            }
        }
        Ok(())
    }
}
