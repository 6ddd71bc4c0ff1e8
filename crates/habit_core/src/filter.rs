use chrono::NaiveDate;

use crate::date::weekday_index;
use crate::todo::{Schedule, Todo};

/// Whether `todo` belongs on the view for `reference`. The task must exist
/// by that calendar day (creation time truncated to a date), and a daily
/// task must have the reference weekday scheduled. Weekly tasks can be
/// worked on any day of their week.
pub fn is_active_on(todo: &Todo, reference: NaiveDate) -> bool {
    if todo.created_at.date_naive() > reference {
        return false;
    }
    match &todo.schedule {
        Schedule::Daily { days } => days.contains(&weekday_index(reference)),
        Schedule::Weekly { .. } => true,
    }
}

/// Filters `todos` down to the ones active on `reference`, preserving the
/// input order.
pub fn active_todos(todos: &[Todo], reference: NaiveDate) -> impl Iterator<Item = &Todo> {
    todos
        .iter()
        .filter(move |todo| is_active_on(todo, reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn created(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    fn daily(title: &str, days: &[u8], created_at: DateTime<Utc>) -> Todo {
        Todo::new(
            title,
            Schedule::Daily {
                days: days.iter().copied().collect(),
            },
            created_at,
        )
    }

    #[test]
    fn daily_task_shows_only_on_scheduled_weekdays() {
        // Monday and Wednesday; 2024-01-01 is a Monday.
        let todo = daily("stretch", &[1, 3], created(2024, 1, 1));
        assert!(is_active_on(&todo, date(2024, 1, 1)));
        assert!(is_active_on(&todo, date(2024, 1, 3)));
        assert!(!is_active_on(&todo, date(2024, 1, 2)));
        assert!(!is_active_on(&todo, date(2024, 1, 7)));
    }

    #[test]
    fn weekly_task_shows_every_day_once_created() {
        let todo = Todo::new(
            "long run",
            Schedule::Weekly { frequency: 2 },
            created(2024, 1, 3),
        );
        for day in 3..=9 {
            assert!(is_active_on(&todo, date(2024, 1, day)));
        }
    }

    #[test]
    fn tasks_created_later_are_hidden_until_their_day() {
        let todo = daily("stretch", &[0, 1, 2, 3, 4, 5, 6], created(2024, 1, 5));
        assert!(!is_active_on(&todo, date(2024, 1, 4)));
        assert!(is_active_on(&todo, date(2024, 1, 5)));
        assert!(is_active_on(&todo, date(2024, 1, 6)));
    }

    #[test]
    fn active_todos_keeps_input_order() {
        let todos = vec![
            daily("monday only", &[1], created(2024, 1, 1)),
            Todo::new(
                "weekly",
                Schedule::Weekly { frequency: 1 },
                created(2024, 1, 1),
            ),
            daily("tuesday only", &[2], created(2024, 1, 1)),
            daily("every day", &[0, 1, 2, 3, 4, 5, 6], created(2024, 1, 1)),
        ];

        let titles: Vec<&str> = active_todos(&todos, date(2024, 1, 2))
            .map(|todo| todo.title.as_str())
            .collect();
        assert_eq!(titles, ["weekly", "tuesday only", "every day"]);
    }
}
