pub mod memory;
pub mod service;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::service::TodoService;
pub use crate::store::{ChangeListener, StorageError, Subscription, TodoStore};
