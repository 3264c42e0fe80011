use std::io::Write;
use std::time::{Duration, Instant};

use crate::handoff::{Inbox, Wake};
use crate::state::TaskState;
use crate::style::{self, Tone};
use crate::terminal::Terminal;
use crate::util::Spinner;

/// Redraws one task's status line until the task shuts down.
///
/// Runs on its own thread. Between ticks it blocks on the [`Inbox`],
/// waking on whichever comes first: the next tick or a new snapshot.
/// On shutdown (or when the handle is gone) it draws exactly one final
/// frame and hands the terminal back.
pub(crate) struct RenderLoop<T: Terminal> {
    terminal: T,
    state: TaskState,
    spinner: Spinner,
    interval: Duration,
    colored: bool,
}

impl<T: Terminal> RenderLoop<T> {
    pub(crate) fn new(terminal: T, state: TaskState) -> Self {
        Self {
            terminal,
            state,
            spinner: Spinner::default(),
            interval: Duration::from_millis(100),
            colored: true,
        }
    }

    pub(crate) fn interval(mut self, d: Duration) -> Self {
        self.interval = d;
        self
    }

    pub(crate) fn spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub(crate) fn colored(mut self, yes: bool) -> Self {
        self.colored = yes;
        self
    }

    /// Runs until shutdown, then returns the terminal.
    pub(crate) fn run(mut self, inbox: Inbox) -> T {
        self.draw(Self::tick_frame);
        let mut next_tick = Instant::now() + self.interval;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match inbox.wait(timeout) {
                Wake::Tick => {
                    self.spinner.tick();
                    self.draw(Self::tick_frame);
                    next_tick = Instant::now() + self.interval;
                }
                Wake::Update(Some(state)) => {
                    self.state = state;
                    self.draw(Self::tick_frame);
                }
                Wake::Update(None) => {}
                Wake::Shutdown(state) => {
                    if let Some(state) = state {
                        self.state = state;
                    }
                    break;
                }
            }
        }

        self.draw(Self::final_frame);
        self.terminal
    }

    /// Writes a frame in one call and flushes. Write failures drop the frame.
    fn draw(&mut self, frame: fn(&Self, &mut String)) {
        let mut out = self.clear_line();
        frame(&*self, &mut out);
        let written = self
            .terminal
            .write_all(out.as_bytes())
            .and_then(|()| self.terminal.flush());
        if let Err(err) = written {
            tracing::debug!(%err, "dropped status frame");
        }
    }

    /// Returns to column 0 and blanks the line. Without a known width only
    /// the carriage return is emitted.
    fn clear_line(&self) -> String {
        match self.terminal.width() {
            Ok(width) => format!("\r{}\r", " ".repeat(usize::from(width))),
            Err(err) => {
                tracing::trace!(%err, "terminal width unavailable, not clearing line");
                "\r".to_string()
            }
        }
    }

    fn tick_frame(&self, out: &mut String) {
        let state = &self.state;
        let (glyph, tone) = style::glyph(state.status, state.ongoing, self.spinner.frame());
        out.push_str(&style::paint(glyph, tone, self.colored));
        out.push(' ');
        out.push_str(&state.title);
    }

    // The final frame never shows the spinner, even if the handle was
    // dropped while the work was still running.
    fn final_frame(&self, out: &mut String) {
        let (glyph, tone) = style::glyph(self.state.status, false, "");
        out.push_str(&style::paint(glyph, tone, self.colored));
        out.push(' ');
        out.push_str(&style::paint(&self.state.title, Tone::Emphasis, self.colored));
        out.push('\n');
        if !self.state.detail.is_empty() {
            out.push_str("  ");
            out.push_str(style::ARROW);
            out.push(' ');
            out.push_str(&self.state.detail);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::handoff;
    use crate::test::VirtualTerm;

    fn render_loop(term: &VirtualTerm, state: TaskState) -> RenderLoop<VirtualTerm> {
        RenderLoop::new(term.clone(), state)
            .colored(false)
            .interval(Duration::from_millis(5))
            .spinner(Spinner::line())
    }

    #[test]
    fn final_frame_with_detail() {
        let term = VirtualTerm::new();
        let mut state = TaskState::new("build");
        state.set_warning("slow");
        state.finish(None);

        let (outbox, inbox) = handoff();
        outbox.shutdown();
        render_loop(&term, state).run(inbox);

        assert_eq!(term.render(), "⚠ build\n  → slow\n");
    }

    #[test]
    fn update_before_shutdown_reaches_final_frame() {
        let term = VirtualTerm::new();
        let mut state = TaskState::new("build");
        let (outbox, inbox) = handoff();

        state.set_title("link");
        state.finish(None);
        outbox.publish(state);
        outbox.shutdown();
        render_loop(&term, TaskState::new("build")).run(inbox);

        assert_eq!(term.render(), "✔ link\n");
    }

    #[test]
    fn dropped_writer_draws_final_frame() {
        let term = VirtualTerm::new();
        let (outbox, inbox) = handoff();
        drop(outbox);
        render_loop(&term, TaskState::new("orphan")).run(inbox);

        // Still ongoing, but the final frame shows the static glyph.
        assert_eq!(term.render(), "✔ orphan\n");
    }

    #[test]
    fn ticks_animate_spinner_while_ongoing() {
        let term = VirtualTerm::new();
        let (outbox, inbox) = handoff();
        let handle = std::thread::spawn({
            let render = render_loop(&term, TaskState::new("wait"));
            move || render.run(inbox)
        });

        std::thread::sleep(Duration::from_millis(60));
        let mut state = TaskState::new("wait");
        state.finish(None);
        outbox.publish(state);
        outbox.shutdown();
        handle.join().unwrap();

        let raw = term.raw();
        assert!(raw.contains("| wait"));
        assert!(raw.contains("/ wait"));
        assert_eq!(term.render(), "✔ wait\n");
    }

    #[test]
    fn unknown_width_skips_clearing() {
        let term = VirtualTerm::without_width();
        let (outbox, inbox) = handoff();
        outbox.shutdown();
        render_loop(&term, TaskState::new("ci")).run(inbox);

        assert_eq!(term.raw(), "\r| ci\r✔ ci\n");
    }

    #[test]
    fn known_width_pads_line() {
        let term = VirtualTerm::with_width(4);
        let (outbox, inbox) = handoff();
        outbox.shutdown();
        render_loop(&term, TaskState::new("ci")).run(inbox);

        assert_eq!(term.raw(), "\r    \r| ci\r    \r✔ ci\n");
    }
}
