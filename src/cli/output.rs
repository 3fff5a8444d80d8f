//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Every helper
//! takes the writer so menu sessions can be captured in tests.

use std::io::{self, Write};

use colored::Colorize;

/// Print error (red bold "error:" prefix)
pub fn error(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}: {}", "error".red().bold(), msg)
}

/// Print warning (yellow "Warning:" prefix)
pub fn warning(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}: {}", "Warning".yellow(), msg)
}

/// Print success status (green checkmark)
pub fn success(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green(), msg)
}

/// Print labelled result (green label)
pub fn action(
    out: &mut dyn Write,
    label: &str,
    msg: &(impl std::fmt::Display + ?Sized),
) -> io::Result<()> {
    writeln!(out, "{}: {}", label.green(), msg)
}

/// Print section header (cyan bold)
pub fn header(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}", msg.to_string().cyan().bold())
}

/// Print indented detail (dimmed)
pub fn detail(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "  {}", msg.to_string().dimmed())
}

/// Print plain output (no color, for data such as tree drawings)
pub fn info(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}", msg)
}

/// Print prompt without newline (cyan)
pub fn prompt(out: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    write!(out, "{} ", msg.to_string().cyan())?;
    out.flush()
}
