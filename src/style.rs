use owo_colors::OwoColorize;

use crate::state::Status;

pub const SUCCESS: &str = "✔";
pub const WARNING: &str = "⚠";
pub const ERROR: &str = "✖";
pub const CANCELLED: &str = "-";
pub const ARROW: &str = "→";

/// Semantic colour of a piece of status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Blue,
    /// Bright white, used for the title in the final frame.
    Emphasis,
}

/// Maps a status to its glyph and tone.
///
/// `spinner` is the frame to show while a successful task is still running.
pub fn glyph(status: Status, ongoing: bool, spinner: &'static str) -> (&'static str, Tone) {
    match status {
        Status::Success if ongoing => (spinner, Tone::Yellow),
        Status::Success => (SUCCESS, Tone::Green),
        Status::Warning => (WARNING, Tone::Yellow),
        Status::Error => (ERROR, Tone::Red),
        Status::Cancelled => (CANCELLED, Tone::Blue),
    }
}

/// Styles `text` with `tone`, or returns it unchanged when colour is off.
pub fn paint(text: &str, tone: Tone, colored: bool) -> String {
    if !colored {
        return text.to_string();
    }
    match tone {
        Tone::Green => text.green().to_string(),
        Tone::Yellow => text.yellow().to_string(),
        Tone::Red => text.red().to_string(),
        Tone::Blue => text.blue().to_string(),
        Tone::Emphasis => text.bright_white().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_per_status() {
        assert_eq!(glyph(Status::Success, false, "⣷"), (SUCCESS, Tone::Green));
        assert_eq!(glyph(Status::Success, true, "⣷"), ("⣷", Tone::Yellow));
        assert_eq!(glyph(Status::Warning, true, "⣷"), (WARNING, Tone::Yellow));
        assert_eq!(glyph(Status::Error, false, "⣷"), (ERROR, Tone::Red));
        assert_eq!(glyph(Status::Cancelled, false, "⣷"), (CANCELLED, Tone::Blue));
    }

    #[test]
    fn paint_plain_is_identity() {
        assert_eq!(paint("✔", Tone::Green, false), "✔");
    }

    #[test]
    fn paint_wraps_in_ansi() {
        let styled = paint("✖", Tone::Red, true);
        assert!(styled.starts_with("\x1b["));
        assert!(styled.contains("✖"));
        assert_ne!(styled, paint("✖", Tone::Blue, true));
    }
}
