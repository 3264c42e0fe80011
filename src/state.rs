use crate::error::{BoxError, TaskError};

/// Semantic status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Success,
    Warning,
    Error,
    Cancelled,
}

/// Snapshot of everything the render loop needs to draw a task.
///
/// Only [`crate::Task`] mutates it. Each transition below produces a new
/// whole snapshot, so a reader never sees half of an update.
#[derive(Debug, Clone)]
pub struct TaskState {
    pub(crate) title: String,
    pub(crate) detail: String,
    pub(crate) status: Status,
    pub(crate) ongoing: bool,
    pub(crate) error: Option<TaskError>,
}

impl TaskState {
    pub(crate) fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: String::new(),
            status: Status::Success,
            ongoing: true,
            error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Secondary text shown beneath the title in the final frame.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// `true` while the work is still running and the task has not been cancelled.
    pub fn ongoing(&self) -> bool {
        self.ongoing
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }

    /// Cancellation is terminal: every later transition is ignored.
    pub fn is_cancelled(&self) -> bool {
        self.status == Status::Cancelled
    }

    // Status, detail and error survive a title change.
    pub(crate) fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    pub(crate) fn set_warning(&mut self, text: impl Into<String>) {
        self.status = Status::Warning;
        self.detail = text.into();
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, err: TaskError) {
        self.status = Status::Error;
        self.detail = err.to_string();
        self.error = Some(err);
    }

    pub(crate) fn clear_error(&mut self) {
        self.status = Status::Success;
        self.detail.clear();
        self.error = None;
    }

    pub(crate) fn set_detail(&mut self, text: impl Into<String>) {
        self.detail = text.into();
    }

    pub(crate) fn cancel(&mut self, reason: &str) {
        self.status = Status::Cancelled;
        self.ongoing = false;
        self.error = Some(TaskError::Cancelled);
        if !reason.is_empty() {
            self.detail = reason.to_string();
        }
    }

    /// Folds the work closure's return into the state once it has finished.
    ///
    /// A returned error becomes an error transition unless the task was
    /// already cancelled, in which case the cancellation stands.
    pub(crate) fn finish(&mut self, returned: Option<BoxError>) {
        self.ongoing = false;
        if let Some(err) = returned
            && !self.is_cancelled()
        {
            self.set_error(TaskError::failed(err));
        }
    }
}
