use std::io;

pub trait SimpleWrite {
    fn write_str(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

impl SimpleWrite for String {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Stream<W>(pub W);

impl<W: io::Write> SimpleWrite for Stream<W> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.0.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// A writer that knows whether it's at the start of a line, so that blocks can each get their own lines.
///
/// Write errors don't interrupt the caller. The first one is kept, everything after it is dropped, and
/// [`Output::finish`] reports it.
pub struct Output<W: SimpleWrite> {
    stream: W,
    at_line_start: bool,
    error: Option<io::Error>,
}

impl<W: SimpleWrite> Output<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            at_line_start: true,
            error: None,
        }
    }

    /// Runs the action on its own line(s): a newline is added before it if needed, and after it if it didn't end with
    /// one.
    pub fn with_block(&mut self, action: impl FnOnce(&mut Self)) {
        self.ensure_line_start();
        action(self);
        self.ensure_line_start();
    }

    pub fn write_str(&mut self, text: &str) {
        if text.is_empty() || self.error.is_some() {
            return;
        }
        match self.stream.write_str(text) {
            Ok(()) => self.at_line_start = text.ends_with('\n'),
            Err(err) => self.error = Some(err),
        }
    }

    /// Flushes the underlying stream and returns it, or the first error that any write hit.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.stream.flush()?;
        Ok(self.stream)
    }

    fn ensure_line_start(&mut self) {
        if !self.at_line_start {
            self.write_str("\n");
        }
    }
}
