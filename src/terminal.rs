use std::io::Write;

/// Output sink the render loop draws into.
///
/// Implementors accept raw text and control sequences through [`Write`]
/// and report the current line width. A width error is not fatal: the
/// renderer skips line clearing for that frame.
pub trait Terminal: Write + Send + 'static {
    fn width(&self) -> std::io::Result<u16>;
}

/// Process stdout, with width queried from the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Write for Stdout {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stdout().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}

impl Terminal for Stdout {
    fn width(&self) -> std::io::Result<u16> {
        crossterm::terminal::size().map(|(columns, _)| columns)
    }
}
