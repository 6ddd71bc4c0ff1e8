use habit_core::{HabitTracker, Todo};
use thiserror::Error;

/// Opaque failure of a storage backend. Not retriable; the message is for
/// logs and operator eyes, not for matching.
#[derive(Debug, Clone, Error)]
#[error("storage failure: {message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Callback invoked with the full hydrated todo list after every todo-table
/// mutation. Runs synchronously on the mutating thread.
pub type ChangeListener = Box<dyn Fn(&[Todo]) + Send + Sync>;

/// Live handle for a registered [`ChangeListener`]. Dropping it (or calling
/// [`Subscription::unsubscribe`]) deregisters the listener; holding it keeps
/// the updates coming.
#[must_use = "dropping a Subscription deregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps the store-specific deregistration step.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// Persistence boundary for tasks and their trackers. The two tables are
/// written with separate single-record calls; pairing them up (create todo
/// plus create tracker, delete todo plus delete tracker) is the service's
/// job, not the store's.
///
/// Listeners fire after todo-table mutations only. Tracker-only writes are
/// silent. A listener must not register or cancel subscriptions from inside
/// its callback.
pub trait TodoStore: Send + Sync {
    fn subscribe(&self, listener: ChangeListener) -> Subscription;

    /// Hydrated snapshot in creation order: each todo carries its tracker
    /// in `tracking` when one exists.
    fn todos(&self) -> Result<Vec<Todo>, StorageError>;

    /// Assigns an id to the record and returns it. The stored copy never
    /// keeps a caller-supplied `tracking`; hydration owns that field.
    fn create(&self, todo: Todo) -> Result<String, StorageError>;

    /// Full-record replace, last write wins.
    fn update(&self, id: &str, todo: Todo) -> Result<(), StorageError>;

    fn delete(&self, id: &str) -> Result<(), StorageError>;

    fn tracker(&self, id: &str) -> Result<HabitTracker, StorageError>;

    fn create_tracker(&self, id: &str, tracker: HabitTracker) -> Result<(), StorageError>;

    fn update_tracker(&self, id: &str, tracker: HabitTracker) -> Result<(), StorageError>;

    fn delete_tracker(&self, id: &str) -> Result<(), StorageError>;

    /// Wipes both tables.
    fn clear_all(&self) -> Result<(), StorageError>;
}
