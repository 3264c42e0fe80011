use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::state::TaskState;

/// The single place a task's state crosses to the render thread.
///
/// Holds at most one snapshot: a newer publish overwrites an unread one.
#[derive(Debug, Default)]
struct Slot {
    state: Option<TaskState>,
    shutdown: bool,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    // A slot is always left whole, so a poisoned lock is still usable.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Creates the writer and reader ends of a handoff.
pub(crate) fn handoff() -> (Outbox, Inbox) {
    let slot = Arc::new(Mutex::new(Slot::default()));
    // One pending wake is enough: the reader always takes the latest state.
    let (wake_tx, wake_rx) = mpsc::sync_channel(1);
    (
        Outbox {
            slot: Arc::clone(&slot),
            wake: wake_tx,
        },
        Inbox {
            slot,
            wake: wake_rx,
        },
    )
}

/// Writer end, owned by the [`crate::Task`] handle.
#[derive(Debug)]
pub(crate) struct Outbox {
    slot: Arc<Mutex<Slot>>,
    wake: SyncSender<()>,
}

impl Outbox {
    /// Replaces any unread snapshot with `state`. Never blocks on the reader.
    pub(crate) fn publish(&self, state: TaskState) {
        lock(&self.slot).state = Some(state);
        self.notify();
    }

    /// Asks the reader to draw its final frame.
    pub(crate) fn shutdown(&self) {
        lock(&self.slot).shutdown = true;
        self.notify();
    }

    // A full channel already has a wake pending that will see the new
    // contents. A disconnected one means the render loop has exited.
    fn notify(&self) {
        let _ = self.wake.try_send(());
    }
}

/// What woke the render loop.
#[derive(Debug)]
pub(crate) enum Wake {
    /// The tick interval elapsed.
    Tick,
    /// A publish arrived. `None` when its snapshot was already taken.
    Update(Option<TaskState>),
    /// Shutdown was requested or the writer is gone, with any unread snapshot.
    Shutdown(Option<TaskState>),
}

/// Reader end, owned by the render loop.
#[derive(Debug)]
pub(crate) struct Inbox {
    slot: Arc<Mutex<Slot>>,
    wake: Receiver<()>,
}

impl Inbox {
    /// Blocks until a publish, shutdown or `timeout`, whichever comes first.
    pub(crate) fn wait(&self, timeout: Duration) -> Wake {
        let closed = match self.wake.recv_timeout(timeout) {
            Ok(()) => false,
            Err(RecvTimeoutError::Timeout) => return Wake::Tick,
            Err(RecvTimeoutError::Disconnected) => true,
        };
        let mut slot = lock(&self.slot);
        let state = slot.state.take();
        if slot.shutdown || closed {
            Wake::Shutdown(state)
        } else {
            Wake::Update(state)
        }
    }
}
