use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tracker::HabitTracker;

/// A recurring task definition. The streak ledger itself lives in
/// [`HabitTracker`]; `tracking` is a join slot populated by store reads and
/// ignored by the engine, which always takes the tracker as an explicit
/// argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Empty until the store assigns an id on create.
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schedule: Schedule,
    #[serde(default)]
    pub tracking: Option<HabitTracker>,
}

/// Cadence and its parameters. Cadence is fixed at creation; edits may only
/// change the payload (scheduled days, weekly frequency).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schedule {
    /// Recurs on specific weekdays, each tracked independently.
    /// Indices are Sunday-first: 0 = Sunday .. 6 = Saturday.
    Daily { days: BTreeSet<u8> },
    /// Recurs `frequency` times per Monday-start week.
    Weekly { frequency: u32 },
}

impl Schedule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Schedule::Daily { days } => {
                if days.is_empty() {
                    return Err(ValidationError::NoScheduledDays);
                }
                if let Some(&day) = days.iter().find(|day| **day > 6) {
                    return Err(ValidationError::InvalidWeekday(day));
                }
                Ok(())
            }
            Schedule::Weekly { frequency } => {
                if !(1..=7).contains(frequency) {
                    return Err(ValidationError::FrequencyOutOfRange(*frequency));
                }
                Ok(())
            }
        }
    }
}

impl Todo {
    /// An unsaved task: empty id, no tracker attached, `updated_at` equal to
    /// `created_at`.
    pub fn new(title: impl Into<String>, schedule: Schedule, created_at: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            created_at,
            updated_at: created_at,
            schedule,
            tracking: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.schedule.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn daily(days: &[u8]) -> Schedule {
        Schedule::Daily {
            days: days.iter().copied().collect(),
        }
    }

    #[test]
    fn rejects_blank_titles() {
        let todo = Todo::new("   ", daily(&[1]), created());
        assert_eq!(todo.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn daily_requires_scheduled_days_in_range() {
        let empty = Todo::new("Stretch", daily(&[]), created());
        assert_eq!(empty.validate(), Err(ValidationError::NoScheduledDays));

        let out_of_range = Todo::new("Stretch", daily(&[2, 9]), created());
        assert_eq!(
            out_of_range.validate(),
            Err(ValidationError::InvalidWeekday(9))
        );

        let ok = Todo::new("Stretch", daily(&[0, 6]), created());
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn weekly_frequency_is_bounded() {
        let zero = Todo::new("Run", Schedule::Weekly { frequency: 0 }, created());
        assert_eq!(zero.validate(), Err(ValidationError::FrequencyOutOfRange(0)));

        let eight = Todo::new("Run", Schedule::Weekly { frequency: 8 }, created());
        assert_eq!(
            eight.validate(),
            Err(ValidationError::FrequencyOutOfRange(8))
        );

        let ok = Todo::new("Run", Schedule::Weekly { frequency: 7 }, created());
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn schedule_serializes_with_a_cadence_tag() {
        let daily = serde_json::to_value(daily(&[1, 3])).expect("serialize");
        assert_eq!(daily["type"], "daily");
        assert_eq!(daily["days"], serde_json::json!([1, 3]));

        let weekly =
            serde_json::to_value(Schedule::Weekly { frequency: 2 }).expect("serialize");
        assert_eq!(weekly["type"], "weekly");
        assert_eq!(weekly["frequency"], 2);

        let parsed: Schedule =
            serde_json::from_value(serde_json::json!({"type": "daily", "days": [5]}))
                .expect("deserialize");
        assert_eq!(parsed, super::Schedule::Daily { days: [5].into() });
    }
}
