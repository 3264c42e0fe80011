use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{BoxError, TaskError};
use crate::handoff::handoff;
use crate::render::RenderLoop;
use crate::state::TaskState;
use crate::task::{CancelToken, Task};
use crate::terminal::{Stdout, Terminal};
use crate::util::Spinner;

/// What a finished task hands back.
///
/// `value` and `error` are independent: a task that was cancelled but
/// still returned `Ok` keeps its value. `value` is `None` only when the
/// work returned `Err`, in which case `error` is always set.
#[derive(Debug)]
#[must_use]
pub struct Outcome<R> {
    /// The work's `Ok` value.
    pub value: Option<R>,
    /// The error recorded in the task's final state.
    pub error: Option<TaskError>,
    /// Final snapshot, as drawn in the last frame.
    pub state: TaskState,
}

impl<R> Outcome<R> {
    /// Collapses into a `Result`, preferring the recorded error.
    pub fn into_result(self) -> Result<R, TaskError> {
        match (self.value, self.error) {
            (_, Some(err)) => Err(err),
            (Some(value), None) => Ok(value),
            (None, None) => unreachable!("a task without a value always records an error"),
        }
    }
}

/// Runs work behind a live status line.
///
/// ```rust,ignore
/// let runner = TaskRunner::stdout()
///     .interval(Duration::from_millis(80))
///     .spinner(Spinner::dots());
///
/// let outcome = runner.run("compile", |task| {
///     task.set_detail("3 crates");
///     compile()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct TaskRunner<T: Terminal + Clone> {
    terminal: T,
    interval: Duration,
    spinner: Spinner,
    colored: bool,
}

impl TaskRunner<Stdout> {
    /// A runner drawing to stdout with the default settings.
    pub fn stdout() -> Self {
        Self::new(Stdout)
    }
}

impl<T: Terminal + Clone> TaskRunner<T> {
    /// Create a runner with defaults: 100 ms frames (10 fps), the
    /// [`Spinner::pulse`] animation, and colour unless `NO_COLOR` is set.
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            interval: Duration::from_millis(100),
            spinner: Spinner::default(),
            colored: std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty()),
        }
    }

    /// Set the repaint interval.
    pub fn interval(mut self, d: Duration) -> Self {
        self.interval = d;
        self
    }

    /// Set the in-progress animation.
    pub fn spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    /// Whether glyphs and the final title are styled with ANSI colours.
    pub fn colored(mut self, yes: bool) -> Self {
        self.colored = yes;
        self
    }

    /// Runs `work` on the calling thread while a render thread animates the
    /// status line.
    ///
    /// Blocks until the work has returned and the final frame has been
    /// flushed. There is no timeout on that last wait. A panic in `work` is
    /// not caught: the line is finalized as failed, then the panic resumes.
    pub fn run<R, E, F>(&self, title: impl Into<String>, work: F) -> Outcome<R>
    where
        F: FnOnce(&mut Task) -> Result<R, E>,
        E: Into<BoxError>,
    {
        let state = TaskState::new(title);
        let span = tracing::debug_span!("task", title = %state.title());
        let _enter = span.enter();
        let started = Instant::now();

        let (outbox, inbox) = handoff();
        let render = RenderLoop::new(self.terminal.clone(), state.clone())
            .interval(self.interval)
            .spinner(self.spinner.clone())
            .colored(self.colored);
        let render_span = span.clone();
        let renderer = std::thread::Builder::new()
            .name("task-tally".into())
            .spawn(move || render_span.in_scope(|| render.run(inbox)));
        let renderer = RenderThread(match renderer {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::debug!(%err, "render thread failed to start, running without status line");
                None
            }
        });

        // Declared after `renderer` so that on unwind the handle's final
        // state is published before the render thread is joined.
        let mut task = Task::new(state, CancelToken::default(), outbox);
        tracing::debug!("task started");

        let (value, returned) = match work(&mut task) {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err.into())),
        };
        let state = task.finish(returned);
        renderer.join();

        tracing::debug!(
            status = ?state.status(),
            elapsed = ?started.elapsed(),
            "task finished"
        );

        Outcome {
            value,
            error: state.error().cloned(),
            state,
        }
    }
}

/// Joins the render thread when dropped, including while unwinding.
struct RenderThread<T>(Option<JoinHandle<T>>);

impl<T> RenderThread<T> {
    fn join(mut self) {
        self.join_inner();
    }

    fn join_inner(&mut self) {
        if let Some(handle) = self.0.take()
            && handle.join().is_err()
        {
            tracing::debug!("render thread panicked");
        }
    }
}

impl<T> Drop for RenderThread<T> {
    fn drop(&mut self) {
        self.join_inner();
    }
}
