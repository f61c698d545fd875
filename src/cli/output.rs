//! Colored terminal output for build operations
//!
//! Provides consistent, colored CLI output with proper formatting

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet: self.quiet,
        }
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn print_marked(
        &self,
        marker: &str,
        color: Color,
        bold: bool,
        message: &str,
    ) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = write!(&mut buffer, "{}", marker);
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.print_marked("✓", Color::Green, true, message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.print_marked("⚠", Color::Yellow, true, message)
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.print_marked("⋯", Color::Magenta, false, message)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red))).is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || buffer.reset().is_err()
            || bufwtr.print(&buffer).is_err()
        {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {}", message);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer);
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items and streamed docker output)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        self.bufwtr.print(&buffer)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
