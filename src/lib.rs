#![doc = include_str!("../README.md")]

pub(crate) mod error;
pub(crate) mod handoff;
pub(crate) mod render;
pub(crate) mod runner;
pub(crate) mod state;
pub mod style;
pub(crate) mod task;
pub(crate) mod terminal;
pub mod util;


/// Re-exports of all public types and traits.
pub mod prelude {
    pub use crate::error::{BoxError, TaskError};
    pub use crate::run_task;
    pub use crate::runner::{Outcome, TaskRunner};
    pub use crate::state::{Status, TaskState};
    pub use crate::task::{CancelToken, Task};
    pub use crate::terminal::{Stdout, Terminal};
    pub use crate::util::Spinner;
}

pub use crate::prelude::*;

/// Runs `work` while animating its status line on stdout.
///
/// The closure receives a [`Task`] handle for reporting progress. When it
/// returns, the line is finalized with a status glyph and, if set, the
/// detail text on a second line. Shorthand for
/// `TaskRunner::stdout().run(title, work)`.
///
/// ```rust,no_run
/// use task_tally::run_task;
///
/// let outcome = run_task("build", |task| {
///     std::thread::sleep(std::time::Duration::from_secs(1));
///     task.set_warning("slow");
///     Ok::<_, std::io::Error>(1)
/// });
/// assert_eq!(outcome.value, Some(1));
/// ```
pub fn run_task<R, E, F>(title: impl Into<String>, work: F) -> Outcome<R>
where
    F: FnOnce(&mut Task) -> Result<R, E>,
    E: Into<BoxError>,
{
    TaskRunner::stdout().run(title, work)
}
