pub mod date;
pub mod error;
pub mod filter;
pub mod streak;
pub mod todo;
pub mod tracker;

pub use crate::error::{HabitError, ValidationError};
pub use crate::streak::StreakSummary;
pub use crate::todo::{Schedule, Todo};
pub use crate::tracker::{Completion, HabitTracker, Progress, WeekSummary};
