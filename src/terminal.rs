//! Terminal control sequences.
//!
//! Only two movements are ever needed: erasing the rest of the current line before a
//! repaint, and stepping the cursor up one line to return to the top of a stacked block.

/// Erases from the cursor to the end of the current line.
pub const CLEAR_TO_END: &str = "\x1b[K";

/// Moves the cursor up by one line, keeping its column.
pub const UP_ONE_LINE: &str = "\x1b[1A";

/// Returns the prefix written before every single-line repaint: carriage return, then
/// clear-to-end.
#[must_use]
pub fn line_reset() -> String {
    format!("\r{CLEAR_TO_END}")
}

/// Returns `lines` cursor-up sequences, or an empty string for zero.
#[must_use]
pub fn cursor_up(lines: usize) -> String {
    UP_ONE_LINE.repeat(lines)
}
