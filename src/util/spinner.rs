/// Frame sequence for the in-progress glyph.
///
/// The render loop calls [`Spinner::tick`] once per elapsed interval and
/// draws [`Spinner::frame`] in front of the title while a task is ongoing.
///
/// ```rust,ignore
/// let runner = TaskRunner::stdout().spinner(Spinner::line());
/// ```
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    index: usize,
}

impl Spinner {
    /// Rotating braille block (the default).
    pub fn pulse() -> Self {
        Self::custom(&["⣷", "⣯", "⣟", "⡿", "⢿", "⣻", "⣽", "⣾"])
    }

    /// Braille dots.
    pub fn dots() -> Self {
        Self::custom(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    /// ASCII-only line spinner, for terminals without braille glyphs.
    pub fn line() -> Self {
        Self::custom(&["|", "/", "-", "\\"])
    }

    /// Custom frames. An empty slice renders an empty glyph.
    pub fn custom(frames: &'static [&'static str]) -> Self {
        Self { frames, index: 0 }
    }

    pub fn tick(&mut self) {
        if !self.frames.is_empty() {
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    pub fn frame(&self) -> &'static str {
        self.frames.get(self.index).copied().unwrap_or("")
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::pulse()
    }
}

impl std::fmt::Display for Spinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_wraps_around() {
        let mut spinner = Spinner::line();
        let seen: Vec<_> = (0..5)
            .map(|_| {
                let frame = spinner.frame();
                spinner.tick();
                frame
            })
            .collect();
        assert_eq!(seen, ["|", "/", "-", "\\", "|"]);
    }

    #[test]
    fn empty_frames_render_nothing() {
        let mut spinner = Spinner::custom(&[]);
        spinner.tick();
        assert_eq!(spinner.to_string(), "");
    }

    #[test]
    fn pulse_is_default() {
        assert_eq!(Spinner::default().frame(), "⣷");
    }
}
