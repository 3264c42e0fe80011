use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{BoxError, TaskError};
use crate::handoff::Outbox;
use crate::state::{Status, TaskState};

/// One-shot cancellation flag shared by a task's handle and anything the
/// work hands it to.
///
/// Once set it stays set. Clone it into worker threads to let them stop
/// early:
///
/// ```rust,ignore
/// let token = task.token();
/// std::thread::spawn(move || {
///     while !token.is_cancelled() {
///         // ...
///     }
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets the flag. Returns `true` only for the call that set it.
    pub(crate) fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

/// Handle passed to the work closure, used to report progress.
///
/// Every transition updates the task's state and overwrites the snapshot
/// the render loop will draw next, without waiting for it. After [`Task::cancel`] the
/// state is terminal: later transitions are accepted and ignored.
///
/// ```rust,ignore
/// run_task("fetch index", |task| {
///     task.set_detail("mirror 1");
///     if slow {
///         task.set_warning("mirror 1 is slow");
///     }
///     Ok::<_, std::io::Error>(index)
/// });
/// ```
#[derive(Debug)]
pub struct Task {
    state: TaskState,
    token: CancelToken,
    outbox: Outbox,
}

impl Task {
    pub(crate) fn new(state: TaskState, token: CancelToken, outbox: Outbox) -> Self {
        Self {
            state,
            token,
            outbox,
        }
    }

    /// Replaces the title. Status, detail and any recorded error are kept.
    pub fn set_title(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transition("title", |state| state.set_title(text));
    }

    /// Marks the task as warned, with `text` as the detail line.
    ///
    /// A warning replaces any recorded error.
    pub fn set_warning(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transition("warning", |state| state.set_warning(text));
    }

    /// Marks the task as failed. The error's message becomes the detail line
    /// and the error is returned to the caller unless cleared.
    pub fn set_error(&mut self, err: impl Into<BoxError>) {
        let err = TaskError::failed(err);
        self.transition("error", |state| state.set_error(err));
    }

    /// Drops a recorded error, resetting status to success and clearing the detail.
    pub fn clear_error(&mut self) {
        self.transition("clear_error", TaskState::clear_error);
    }

    /// Sets the detail line without touching the status.
    pub fn set_detail(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transition("detail", |state| state.set_detail(text));
    }

    /// Cancels the task and stops the status line right away.
    ///
    /// A non-empty `reason` becomes the detail line. The work closure keeps
    /// running until it returns; check [`Task::is_cancelled`] to stop early.
    pub fn cancel(&mut self, reason: &str) {
        if self.state.is_cancelled() {
            tracing::trace!("task already cancelled");
            return;
        }
        self.state.cancel(reason);
        tracing::trace!(reason, "task cancelled");
        self.publish();
        self.shutdown();
    }

    pub fn title(&self) -> &str {
        self.state.title()
    }

    pub fn detail(&self) -> &str {
        self.state.detail()
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Current state, as the render loop will next see it.
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A clone of the task's cancellation flag.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Folds the work's returned error into the state, publishes it, then
    /// signals shutdown. The snapshot is in place before the shutdown, so the
    /// final frame reflects it.
    pub(crate) fn finish(&mut self, returned: Option<BoxError>) -> TaskState {
        self.state.finish(returned);
        self.publish();
        self.shutdown();
        self.state.clone()
    }

    fn transition(&mut self, name: &'static str, apply: impl FnOnce(&mut TaskState)) {
        if self.state.is_cancelled() {
            tracing::trace!(transition = name, "ignored after cancellation");
            return;
        }
        apply(&mut self.state);
        tracing::trace!(transition = name, status = ?self.state.status(), "task updated");
        self.publish();
    }

    fn publish(&self) {
        self.outbox.publish(self.state.clone());
    }

    fn shutdown(&self) {
        if self.token.cancel() {
            self.outbox.shutdown();
        }
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        // Unwinding out of the work closure: `finish` never ran.
        if std::thread::panicking() && self.state.ongoing() {
            self.state.set_error(TaskError::failed("task panicked"));
            self.state.ongoing = false;
            tracing::debug!("task panicked");
            self.publish();
        }
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::handoff::{Inbox, Wake, handoff};

    fn task(title: &str) -> (Task, Inbox) {
        let (outbox, inbox) = handoff();
        let task = Task::new(TaskState::new(title), CancelToken::default(), outbox);
        (task, inbox)
    }

    fn next(inbox: &Inbox) -> Wake {
        inbox.wait(Duration::ZERO)
    }

    #[test]
    fn latest_transition_wins() {
        let (mut task, inbox) = task("a");
        task.set_title("b");
        task.set_title("c");
        assert!(matches!(next(&inbox), Wake::Update(Some(s)) if s.title() == "c"));
        assert!(matches!(next(&inbox), Wake::Tick));
    }

    #[test]
    fn stalled_reader_holds_one_snapshot() {
        let (mut task, inbox) = task("a");
        let padding = "x".repeat(64);
        for i in 0..100_000 {
            task.set_detail(format!("{padding}{i}"));
        }
        let expected = format!("{padding}99999");
        assert!(matches!(next(&inbox), Wake::Update(Some(s)) if s.detail() == expected));
        assert!(matches!(next(&inbox), Wake::Tick));
    }

    #[test]
    fn cancel_publishes_then_shuts_down_once() {
        let (mut task, inbox) = task("a");
        task.cancel("stop");
        task.cancel("again");
        assert!(task.is_cancelled());
        assert_eq!(task.detail(), "stop");
        assert!(matches!(next(&inbox), Wake::Shutdown(Some(s)) if s.detail() == "stop"));
    }

    #[test]
    fn transitions_after_cancel_are_ignored() {
        let (mut task, inbox) = task("a");
        task.cancel("stop");
        assert!(matches!(next(&inbox), Wake::Shutdown(Some(_))));
        task.set_title("b");
        task.set_error("late failure");
        task.clear_error();
        assert_eq!(task.title(), "a");
        assert_eq!(task.status(), Status::Cancelled);
        assert!(matches!(next(&inbox), Wake::Tick));
    }

    #[test]
    fn token_is_shared() {
        let (mut task, _inbox) = task("a");
        let token = task.token();
        assert!(!token.is_cancelled());
        task.cancel("");
        assert!(token.is_cancelled());
    }

    #[test]
    fn drop_signals_shutdown() {
        let (task, inbox) = task("a");
        drop(task);
        assert!(matches!(next(&inbox), Wake::Shutdown(None)));
    }

    #[test]
    fn drop_while_panicking_records_failure() {
        let (task, inbox) = task("a");
        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _task = task;
            panic!("boom");
        }));
        assert!(unwound.is_err());
        let wake = next(&inbox);
        assert!(matches!(
            wake,
            Wake::Shutdown(Some(ref s)) if s.status() == Status::Error && !s.ongoing()
        ));
    }

    #[test]
    fn finish_publishes_state_before_shutdown() {
        let (mut task, inbox) = task("a");
        let state = task.finish(Some("boom".into()));
        assert_eq!(state.status(), Status::Error);
        assert!(matches!(next(&inbox), Wake::Shutdown(Some(s)) if !s.ongoing()));
    }
}
