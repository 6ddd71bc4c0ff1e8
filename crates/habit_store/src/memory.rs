use std::collections::HashMap;
use std::sync::Arc;

use habit_core::{HabitTracker, Todo};
use parking_lot::{Mutex, RwLock};

use crate::store::{ChangeListener, StorageError, Subscription, TodoStore};

#[derive(Default)]
struct Tables {
    /// Creation order, which is also the order snapshots report.
    todos: Vec<Todo>,
    trackers: HashMap<String, HabitTracker>,
    next_id: u64,
}

#[derive(Default)]
struct ListenerTable {
    entries: HashMap<u64, ChangeListener>,
    next_id: u64,
}

/// In-memory [`TodoStore`]. Clones share the same tables, so a service and
/// a test can watch one store through separate handles. Ids are sequential
/// (`todo-1`, `todo-2`, ...) and never reused, even across `clear_all`.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    listeners: Arc<Mutex<ListenerTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            listeners: Arc::new(Mutex::new(ListenerTable::default())),
        }
    }

    fn snapshot(tables: &Tables) -> Vec<Todo> {
        tables
            .todos
            .iter()
            .map(|todo| {
                let mut todo = todo.clone();
                todo.tracking = tables.trackers.get(&todo.id).cloned();
                todo
            })
            .collect()
    }

    /// Fans the current hydrated snapshot out to every listener. Callers
    /// must not hold the tables lock.
    fn notify(&self) {
        let snapshot = Self::snapshot(&self.tables.read());
        let listeners = self.listeners.lock();
        if listeners.entries.is_empty() {
            return;
        }
        tracing::debug!(
            listeners = listeners.entries.len(),
            todos = snapshot.len(),
            "notifying change listeners"
        );
        for listener in listeners.entries.values() {
            listener(&snapshot);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore for MemoryStore {
    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            listeners.next_id += 1;
            let id = listeners.next_id;
            listeners.entries.insert(id, listener);
            id
        };
        let registry = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().entries.remove(&id);
            }
        })
    }

    fn todos(&self) -> Result<Vec<Todo>, StorageError> {
        Ok(Self::snapshot(&self.tables.read()))
    }

    fn create(&self, todo: Todo) -> Result<String, StorageError> {
        let id = {
            let mut tables = self.tables.write();
            tables.next_id += 1;
            let id = format!("todo-{}", tables.next_id);
            let mut stored = todo;
            stored.id = id.clone();
            stored.tracking = None;
            tables.todos.push(stored);
            id
        };
        self.notify();
        Ok(id)
    }

    fn update(&self, id: &str, todo: Todo) -> Result<(), StorageError> {
        {
            let mut tables = self.tables.write();
            let slot = tables
                .todos
                .iter_mut()
                .find(|stored| stored.id == id)
                .ok_or_else(|| StorageError::new(format!("no todo with id {id}")))?;
            let mut replacement = todo;
            replacement.id = id.to_string();
            replacement.tracking = None;
            *slot = replacement;
        }
        self.notify();
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        {
            let mut tables = self.tables.write();
            let index = tables
                .todos
                .iter()
                .position(|stored| stored.id == id)
                .ok_or_else(|| StorageError::new(format!("no todo with id {id}")))?;
            tables.todos.remove(index);
        }
        self.notify();
        Ok(())
    }

    fn tracker(&self, id: &str) -> Result<HabitTracker, StorageError> {
        self.tables
            .read()
            .trackers
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::new(format!("no tracker for todo {id}")))
    }

    fn create_tracker(&self, id: &str, tracker: HabitTracker) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        if tables.trackers.contains_key(id) {
            return Err(StorageError::new(format!(
                "tracker for todo {id} already exists"
            )));
        }
        tables.trackers.insert(id.to_string(), tracker);
        Ok(())
    }

    fn update_tracker(&self, id: &str, tracker: HabitTracker) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        let slot = tables
            .trackers
            .get_mut(id)
            .ok_or_else(|| StorageError::new(format!("no tracker for todo {id}")))?;
        *slot = tracker;
        Ok(())
    }

    fn delete_tracker(&self, id: &str) -> Result<(), StorageError> {
        self.tables
            .write()
            .trackers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::new(format!("no tracker for todo {id}")))
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        {
            let mut tables = self.tables.write();
            tables.todos.clear();
            tables.trackers.clear();
        }
        self.notify();
        Ok(())
    }
}
