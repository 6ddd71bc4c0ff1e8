use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use habit_core::{filter, Completion, HabitTracker, Todo};

use crate::store::{ChangeListener, Subscription, TodoStore};

/// Orchestrates the flows the tracker engine leaves to its caller: pairing
/// todo and tracker writes, reloading stored state before a mutation, and
/// fanning snapshots out to subscribers. Generic over the store so tests
/// and embedders pick the backend.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a new task together with its fresh tracker.
    /// The store assigns the id; the returned todo is the hydrated record.
    pub fn create_todo(&self, todo: Todo) -> Result<Todo> {
        todo.validate()?;
        let schedule = todo.schedule.clone();
        let created_at = todo.created_at;

        let id = self.store.create(todo)?;
        let tracker = HabitTracker::new(id.clone(), &schedule, created_at);
        self.store.create_tracker(&id, tracker)?;
        tracing::debug!(todo = %id, "created todo with tracker");
        self.todo_by_id(&id)
    }

    /// Persists an edit to an existing task, stamping `updated_at` with the
    /// current time. See [`TodoService::update_todo_at`].
    pub fn update_todo(&self, todo: Todo) -> Result<Todo> {
        self.update_todo_at(todo, Utc::now())
    }

    /// Validates the edited record, applies the schedule change to the
    /// stored tracker (new weekday buckets, edit-week frequency refresh),
    /// then replaces tracker and todo. Returns the hydrated record.
    pub fn update_todo_at(&self, todo: Todo, edited_at: DateTime<Utc>) -> Result<Todo> {
        todo.validate()?;
        if todo.id.is_empty() {
            return Err(anyhow!("cannot update a todo that was never saved"));
        }

        let mut tracker = self.store.tracker(&todo.id)?;
        tracker.apply_schedule_edit(&todo.schedule, edited_at)?;
        self.store.update_tracker(&todo.id, tracker)?;

        let mut todo = todo;
        todo.updated_at = edited_at;
        let id = todo.id.clone();
        self.store.update(&id, todo)?;
        self.todo_by_id(&id)
    }

    /// Marks `date` complete, stamping the clock time from the current wall
    /// clock. See [`TodoService::mark_complete_at`].
    pub fn mark_complete(&self, todo: &Todo, date: NaiveDate) -> Result<Completion> {
        self.mark_complete_at(todo, date, Local::now())
    }

    /// Records a completion against the stored tracker, not the caller's
    /// copy, so a stale view still trips the duplicate check
    /// (`HabitError::AlreadyCompleted`, downcastable). On success the
    /// tracker is written back and the stamp returned.
    pub fn mark_complete_at(
        &self,
        todo: &Todo,
        date: NaiveDate,
        recorded_at: DateTime<Local>,
    ) -> Result<Completion> {
        let mut tracker = self.store.tracker(&todo.id)?;
        let stamp = tracker.record_completion_at(&todo.schedule, date, recorded_at)?;
        self.store.update_tracker(&todo.id, tracker)?;
        tracing::debug!(todo = %todo.id, date = %date, "recorded completion");
        Ok(stamp)
    }

    /// Hydrated todos active on `reference`, in creation order.
    pub fn active_todos(&self, reference: NaiveDate) -> Result<Vec<Todo>> {
        let todos = self.store.todos()?;
        Ok(filter::active_todos(&todos, reference).cloned().collect())
    }

    /// Fresh-read lookup of the completion recorded for `date`, if any.
    pub fn completion_on(&self, todo: &Todo, date: NaiveDate) -> Result<Option<Completion>> {
        let tracker = self.store.tracker(&todo.id)?;
        Ok(tracker.completion_on(date).cloned())
    }

    /// Deletes the task and its tracker. The cascade lives here; the store
    /// only ever sees single-record deletes.
    pub fn delete_todo(&self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        self.store.delete_tracker(id)?;
        Ok(())
    }

    /// Wipes both tables.
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear_all()?;
        Ok(())
    }

    pub fn subscribe(&self, listener: ChangeListener) -> Subscription {
        self.store.subscribe(listener)
    }

    fn todo_by_id(&self, id: &str) -> Result<Todo> {
        self.store
            .todos()?
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or_else(|| anyhow!("todo {id} not found after write"))
    }
}
