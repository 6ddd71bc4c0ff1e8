use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::week_key_start;
use crate::tracker::WeekProgress;

/// Current and longest streak counters, both in completions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Ongoing streak for one weekday bucket: walk backward from the most
/// recent date while consecutive occurrences are exactly seven days apart.
/// The most recent date always counts, so non-empty input yields at least 1.
pub fn daily_current_streak(dates: &[NaiveDate]) -> u32 {
    let mut streak = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in descending(dates) {
        match previous {
            None => streak = 1,
            Some(prev) if (prev - date).num_days() == 7 => streak += 1,
            Some(_) => break,
        }
        previous = Some(date);
    }

    streak
}

/// Longest run of exactly-seven-day gaps anywhere in the bucket's history.
pub fn daily_longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in descending(dates) {
        match previous {
            None => run = 1,
            Some(prev) if (prev - date).num_days() == 7 => run += 1,
            Some(_) => {
                longest = longest.max(run);
                run = 1;
            }
        }
        previous = Some(date);
    }

    longest.max(run)
}

/// Streaks over a weekly ledger. Week buckets are walked in chronological
/// order of their embedded start dates; a week meeting its frequency target
/// adds `frequency` to the running streak (the unit is completions, not
/// weeks), and a week falling short resets it. Weeks with no bucket are not
/// visited at all. `current` is the running value after the last recorded
/// week; `longest` is the maximum it ever reached.
pub fn weekly_streaks(weeks: &HashMap<String, WeekProgress>) -> StreakSummary {
    let mut ordered: Vec<(NaiveDate, &WeekProgress)> = weeks
        .iter()
        .filter_map(|(key, week)| week_key_start(key).map(|start| (start, week)))
        .collect();
    ordered.sort_by_key(|(start, _)| *start);

    let mut summary = StreakSummary::default();
    for (_, week) in ordered {
        if week.completed_dates.len() as u32 >= week.frequency {
            summary.current += week.frequency;
        } else {
            summary.current = 0;
        }
        summary.longest = summary.longest.max(summary.current);
    }

    summary
}

fn descending(dates: &[NaiveDate]) -> impl Iterator<Item = NaiveDate> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::week_key;
    use crate::tracker::Completion;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn week(start: NaiveDate, completions: u32, frequency: u32) -> (String, WeekProgress) {
        let completed_dates = (0..completions)
            .map(|offset| Completion {
                date: start + chrono::Duration::days(offset as i64),
                time: "9:00 am".to_string(),
            })
            .collect();
        (
            week_key(start),
            WeekProgress {
                completed_dates,
                frequency,
            },
        )
    }

    #[test]
    fn current_streak_counts_exact_seven_day_gaps() {
        let dates = [date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)];
        assert_eq!(daily_current_streak(&dates), 3);
        assert_eq!(daily_longest_streak(&dates), 3);
    }

    #[test]
    fn current_streak_stops_at_the_first_irregular_gap() {
        // 2024-01-10 sits five days before the most recent date, so the walk
        // stops after counting 2024-01-15 alone.
        let dates = [
            date(2024, 1, 1),
            date(2024, 1, 8),
            date(2024, 1, 10),
            date(2024, 1, 15),
        ];
        assert_eq!(daily_current_streak(&dates), 1);
    }

    #[test]
    fn current_streak_of_empty_and_singleton_buckets() {
        assert_eq!(daily_current_streak(&[]), 0);
        assert_eq!(daily_current_streak(&[date(2024, 5, 6)]), 1);
    }

    #[test]
    fn fortnight_gap_breaks_the_current_streak() {
        let dates = [date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 22)];
        assert_eq!(daily_current_streak(&dates), 2);
    }

    #[test]
    fn longest_streak_survives_later_gaps() {
        // Three-week run early on, then a lone completion after a long break.
        let dates = [
            date(2024, 1, 1),
            date(2024, 1, 8),
            date(2024, 1, 15),
            date(2024, 2, 5),
        ];
        assert_eq!(daily_longest_streak(&dates), 3);
        assert_eq!(daily_current_streak(&dates), 1);
    }

    #[test]
    fn longest_streak_of_empty_bucket_is_zero() {
        assert_eq!(daily_longest_streak(&[]), 0);
    }

    #[test]
    fn weekly_streak_accumulates_in_frequency_units() {
        let mut weeks = HashMap::new();
        for (key, progress) in [
            week(date(2024, 1, 1), 3, 3),
            week(date(2024, 1, 8), 3, 3),
            week(date(2024, 1, 15), 1, 3),
        ] {
            weeks.insert(key, progress);
        }
        let summary = weekly_streaks(&weeks);
        assert_eq!(summary.longest, 6);
        assert_eq!(summary.current, 0);
    }

    #[test]
    fn weekly_streak_resumes_after_a_reset() {
        let mut weeks = HashMap::new();
        for (key, progress) in [
            week(date(2024, 1, 1), 2, 2),
            week(date(2024, 1, 8), 0, 2),
            week(date(2024, 1, 15), 2, 2),
            week(date(2024, 1, 22), 3, 2),
        ] {
            weeks.insert(key, progress);
        }
        let summary = weekly_streaks(&weeks);
        assert_eq!(summary.current, 4);
        assert_eq!(summary.longest, 4);
    }

    #[test]
    fn weekly_walk_orders_by_start_date_not_key_text() {
        // "26/02/2024-..." sorts after "04/03/2024-..." as text; the walk
        // must order by the parsed dates instead.
        let mut weeks = HashMap::new();
        for (key, progress) in [
            week(date(2024, 2, 26), 2, 2),
            week(date(2024, 3, 4), 0, 2),
        ] {
            weeks.insert(key, progress);
        }
        let summary = weekly_streaks(&weeks);
        assert_eq!(summary.current, 0);
        assert_eq!(summary.longest, 2);
    }

    #[test]
    fn weekly_streak_of_empty_ledger_is_zero() {
        assert_eq!(weekly_streaks(&HashMap::new()), StreakSummary::default());
    }
}
