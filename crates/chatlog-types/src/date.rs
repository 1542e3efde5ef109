//! Calendar helpers shared by the store, the relay service and the client.

use chrono::{Local, NaiveDate, NaiveTime};

/// Today's date on the local machine, formatted `YYYY-MM-DD`.
pub fn today() -> String {
    date_key(Local::now().date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a wall-clock `HH:MM` string.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}
