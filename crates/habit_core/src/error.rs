use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by tracker operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitError {
    /// The bucket already holds a completion for this calendar date. The
    /// caller's view of the tracker is stale; reload and surface a notice.
    #[error("task already completed on {date}; refresh to update")]
    AlreadyCompleted { date: NaiveDate },

    /// The schedule and the tracker ledger disagree on cadence. Changing a
    /// task's cadence after creation is unsupported.
    #[error("schedule cadence does not match the tracker ledger")]
    CadenceMismatch,
}

/// Rejections raised when validating a task at create or edit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("todo title cannot be empty")]
    EmptyTitle,

    #[error("daily todo needs at least one scheduled weekday")]
    NoScheduledDays,

    #[error("weekday index {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u8),

    #[error("weekly frequency must be between 1 and 7, got {0}")]
    FrequencyOutOfRange(u32),
}
