use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{format_clock_time, week_key, weekday_index};
use crate::error::HabitError;
use crate::streak::{self, StreakSummary};
use crate::todo::Schedule;

/// One recorded completion. `date` is the semantic calendar day the caller
/// marked complete and the key duplicates are checked against; `time` is an
/// informational wall-clock string captured when the mark was written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completion {
    pub date: NaiveDate,
    pub time: String,
}

/// Ledger bucket for one weekday of a daily task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_dates: Vec<Completion>,
}

/// Ledger bucket for one Monday-Sunday week of a weekly task. `frequency`
/// is a snapshot of the task's target when the bucket was created; schedule
/// edits refresh only the bucket for the week of the edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekProgress {
    pub completed_dates: Vec<Completion>,
    pub frequency: u32,
}

impl WeekProgress {
    pub fn new(frequency: u32) -> Self {
        Self {
            completed_dates: Vec::new(),
            frequency,
        }
    }
}

/// Week buckets keyed by week key, plus the task-level streak counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyAggregate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weeks: HashMap<String, WeekProgress>,
}

/// Cadence-specific ledger. Exactly one variant exists per tracker, so a
/// tracker can never carry both a daily and a weekly ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Progress {
    /// Weekday index (0 = Sunday .. 6 = Saturday) to per-weekday bucket.
    Daily(HashMap<u8, DailyProgress>),
    Weekly(WeeklyAggregate),
}

/// Completed-count against target for one week bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekSummary {
    pub completed: u32,
    pub frequency: u32,
}

/// The persisted habit ledger of one task. Created together with its task
/// and deleted with it; the engine mutates it in place and leaves
/// persistence to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitTracker {
    /// Lookup key back to the owning task, not an ownership link.
    pub todo_id: String,
    pub last_updated: DateTime<Utc>,
    pub progress: Progress,
}

impl HabitTracker {
    /// Fresh ledger for a new task: one zeroed bucket per scheduled weekday,
    /// or the creation week's bucket with the frequency snapshot.
    pub fn new(
        todo_id: impl Into<String>,
        schedule: &Schedule,
        created_at: DateTime<Utc>,
    ) -> Self {
        let progress = match schedule {
            Schedule::Daily { days } => Progress::Daily(
                days.iter()
                    .map(|day| (*day, DailyProgress::default()))
                    .collect(),
            ),
            Schedule::Weekly { frequency } => {
                let mut weeks = HashMap::new();
                weeks.insert(
                    week_key(created_at.date_naive()),
                    WeekProgress::new(*frequency),
                );
                Progress::Weekly(WeeklyAggregate {
                    weeks,
                    ..WeeklyAggregate::default()
                })
            }
        };
        Self {
            todo_id: todo_id.into(),
            last_updated: created_at,
            progress,
        }
    }

    /// Records a completion for `date`, stamping the clock time from the
    /// current wall clock. See [`HabitTracker::record_completion_at`].
    pub fn record_completion(
        &mut self,
        schedule: &Schedule,
        date: NaiveDate,
    ) -> Result<Completion, HabitError> {
        self.record_completion_at(schedule, date, Local::now())
    }

    /// Records a completion for the calendar day `date` in the matching
    /// bucket (weekday bucket for daily ledgers, week bucket for weekly),
    /// creating the bucket when absent, then recomputes the streak counters
    /// for the cadence and returns the appended stamp.
    ///
    /// Fails with [`HabitError::AlreadyCompleted`] when the bucket already
    /// holds a completion for `date`, mutating nothing; the caller's view is
    /// stale and should be reloaded. `recorded_at` feeds only the
    /// informational clock stamp and `last_updated`.
    pub fn record_completion_at(
        &mut self,
        schedule: &Schedule,
        date: NaiveDate,
        recorded_at: DateTime<Local>,
    ) -> Result<Completion, HabitError> {
        let stamp = Completion {
            date,
            time: format_clock_time(recorded_at.time()),
        };

        match (schedule, &mut self.progress) {
            (Schedule::Daily { .. }, Progress::Daily(buckets)) => {
                let bucket = buckets.entry(weekday_index(date)).or_default();
                if bucket.completed_dates.iter().any(|c| c.date == date) {
                    return Err(HabitError::AlreadyCompleted { date });
                }
                bucket.completed_dates.push(stamp.clone());
                let dates: Vec<NaiveDate> =
                    bucket.completed_dates.iter().map(|c| c.date).collect();
                bucket.current_streak = streak::daily_current_streak(&dates);
                bucket.longest_streak = streak::daily_longest_streak(&dates);
            }
            (Schedule::Weekly { frequency }, Progress::Weekly(aggregate)) => {
                let bucket = aggregate
                    .weeks
                    .entry(week_key(date))
                    .or_insert_with(|| WeekProgress::new(*frequency));
                if bucket.completed_dates.iter().any(|c| c.date == date) {
                    return Err(HabitError::AlreadyCompleted { date });
                }
                bucket.completed_dates.push(stamp.clone());
                let summary = streak::weekly_streaks(&aggregate.weeks);
                aggregate.current_streak = summary.current;
                aggregate.longest_streak = summary.longest;
            }
            _ => return Err(HabitError::CadenceMismatch),
        }

        self.last_updated = recorded_at.with_timezone(&Utc);
        Ok(stamp)
    }

    /// The completion recorded for `date`, if any. Pure read.
    pub fn completion_on(&self, date: NaiveDate) -> Option<&Completion> {
        let bucket_dates = match &self.progress {
            Progress::Daily(buckets) => &buckets.get(&weekday_index(date))?.completed_dates,
            Progress::Weekly(aggregate) => {
                &aggregate.weeks.get(&week_key(date))?.completed_dates
            }
        };
        bucket_dates.iter().find(|c| c.date == date)
    }

    /// Streak counters for one weekday bucket; zeros when the bucket is
    /// absent or the ledger is weekly.
    pub fn daily_streak(&self, weekday: u8) -> StreakSummary {
        match &self.progress {
            Progress::Daily(buckets) => buckets
                .get(&weekday)
                .map(|bucket| StreakSummary {
                    current: bucket.current_streak,
                    longest: bucket.longest_streak,
                })
                .unwrap_or_default(),
            Progress::Weekly(_) => StreakSummary::default(),
        }
    }

    /// Task-level streak counters of a weekly ledger; zeros for daily.
    pub fn weekly_streak(&self) -> StreakSummary {
        match &self.progress {
            Progress::Weekly(aggregate) => StreakSummary {
                current: aggregate.current_streak,
                longest: aggregate.longest_streak,
            },
            Progress::Daily(_) => StreakSummary::default(),
        }
    }

    /// The counters presentation shows for `date`: the date's weekday bucket
    /// for daily ledgers, the task-level aggregate for weekly.
    pub fn streak_on(&self, date: NaiveDate) -> StreakSummary {
        match &self.progress {
            Progress::Daily(_) => self.daily_streak(weekday_index(date)),
            Progress::Weekly(_) => self.weekly_streak(),
        }
    }

    /// Completed-count and target for the week containing `date`; zeros when
    /// the week has no bucket or the ledger is daily.
    pub fn week_summary(&self, date: NaiveDate) -> WeekSummary {
        match &self.progress {
            Progress::Weekly(aggregate) => aggregate
                .weeks
                .get(&week_key(date))
                .map(|week| WeekSummary {
                    completed: week.completed_dates.len() as u32,
                    frequency: week.frequency,
                })
                .unwrap_or_default(),
            Progress::Daily(_) => WeekSummary::default(),
        }
    }

    /// Applies a schedule edit to the ledger: newly scheduled weekdays get
    /// zeroed buckets (history on existing buckets is untouched), and a
    /// weekly frequency edit is written into the bucket for the week
    /// containing `edited_at`, creating it if needed. Past week buckets keep
    /// the frequency they were created with.
    pub fn apply_schedule_edit(
        &mut self,
        schedule: &Schedule,
        edited_at: DateTime<Utc>,
    ) -> Result<(), HabitError> {
        match (schedule, &mut self.progress) {
            (Schedule::Daily { days }, Progress::Daily(buckets)) => {
                for day in days {
                    if !buckets.contains_key(day) {
                        tracing::debug!(todo = %self.todo_id, weekday = *day, "opening weekday bucket");
                        buckets.insert(*day, DailyProgress::default());
                    }
                }
            }
            (Schedule::Weekly { frequency }, Progress::Weekly(aggregate)) => {
                aggregate
                    .weeks
                    .entry(week_key(edited_at.date_naive()))
                    .or_insert_with(|| WeekProgress::new(*frequency))
                    .frequency = *frequency;
            }
            _ => return Err(HabitError::CadenceMismatch),
        }

        self.last_updated = edited_at;
        Ok(())
    }
}
