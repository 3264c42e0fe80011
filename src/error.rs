use std::sync::Arc;

/// Boxed error accepted from work closures and [`crate::Task::set_error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error recorded in a task's state.
///
/// Cloneable so that whole-state snapshots can be handed to the render
/// thread. Use [`TaskError::is_cancelled`] to tell a cancellation apart
/// from a failure, and [`TaskError::downcast_ref`] to get back the
/// caller's own error type.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TaskError {
    /// The work failed, either by returning `Err` or through `set_error`.
    #[error(transparent)]
    Failed(Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The task was cancelled with [`crate::Task::cancel`].
    #[error("task cancelled")]
    Cancelled,
}

impl TaskError {
    /// Wraps any error as a [`TaskError::Failed`].
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(Arc::from(err.into()))
    }

    /// Returns `true` for the cancellation sentinel.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the wrapped work error if it is of type `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => err.downcast_ref::<E>(),
            Self::Cancelled => None,
        }
    }
}
