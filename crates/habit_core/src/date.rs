use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday index with Sunday first: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn day_name(index: u8) -> Option<&'static str> {
    DAY_NAMES.get(index as usize).copied()
}

pub fn day_index(name: &str) -> Option<u8> {
    DAY_NAMES
        .iter()
        .position(|day| day.eq_ignore_ascii_case(name))
        .map(|index| index as u8)
}

/// Monday-start week containing `date`. A Sunday belongs to the week that
/// ends on it, so its start is the Monday six days earlier.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Canonical key for the Monday-Sunday span containing `date`,
/// formatted `DD/MM/YYYY-DD/MM/YYYY`.
pub fn week_key(date: NaiveDate) -> String {
    let (start, end) = week_bounds(date);
    format!("{}-{}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
}

/// Start date embedded in a week key, or `None` when the key is malformed.
pub fn week_key_start(key: &str) -> Option<NaiveDate> {
    let (start, _) = key.split_once('-')?;
    NaiveDate::parse_from_str(start, "%d/%m/%Y").ok()
}

pub fn format_date_only(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 12-hour clock string: no leading zero on the hour, zero-padded minutes,
/// lowercase meridiem (`9:05 am`).
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %P").to_string()
}
