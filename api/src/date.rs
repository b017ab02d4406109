//! Calendar keys (`YYYYMMDD`) used both as the API path parameter and as the
//! per-sport view state key.

use chrono::{Datelike, Days, Local, NaiveDate};

/// Source of "today" for anything that needs to compare against it.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> String;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        today()
    }
}

pub fn today() -> String {
    key_for(Local::now().date_naive())
}

pub fn key_for(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

pub fn parse_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = key[0..4].parse().ok()?;
    let month = key[4..6].parse().ok()?;
    let day = key[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Move `key` by `delta_days`. Keys that aren't a real calendar date come
/// back unchanged.
pub fn shift(key: &str, delta_days: i64) -> String {
    let Some(date) = parse_key(key) else {
        return key.to_string();
    };
    let shifted = if delta_days >= 0 {
        date.checked_add_days(Days::new(delta_days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(delta_days.unsigned_abs()))
    };
    shifted.map(key_for).unwrap_or_else(|| key.to_string())
}

pub fn yesterday(key: &str) -> String {
    shift(key, -1)
}

pub fn tomorrow(key: &str) -> String {
    shift(key, 1)
}

/// `20240301` → `2024-03-01`. Anything not exactly 8 characters passes through.
pub fn display(key: &str) -> String {
    if key.len() != 8 || !key.is_ascii() {
        return key.to_string();
    }
    format!("{}-{}-{}", &key[0..4], &key[4..6], &key[6..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_crosses_leap_day() {
        assert_eq!(yesterday("20240301"), "20240229");
        assert_eq!(yesterday("20230301"), "20230228");
        assert_eq!(tomorrow("20240228"), "20240229");
    }

    #[test]
    fn shift_crosses_year_boundary() {
        assert_eq!(tomorrow("20231231"), "20240101");
        assert_eq!(yesterday("20240101"), "20231231");
        assert_eq!(shift("20240115", -45), "20231201");
    }

    #[test]
    fn back_and_forth_is_identity() {
        let mut date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        while date < end {
            let key = key_for(date);
            assert_eq!(shift(&shift(&key, -1), 1), key);
            assert_eq!(shift(&shift(&key, 1), -1), key);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn invalid_keys_pass_through() {
        assert_eq!(shift("20240230", 1), "20240230");
        assert_eq!(shift("2024011", 1), "2024011");
        assert_eq!(shift("abcdefgh", -1), "abcdefgh");
    }

    #[test]
    fn display_formats_only_eight_char_keys() {
        assert_eq!(display("20240301"), "2024-03-01");
        assert_eq!(display("202403"), "202403");
        assert_eq!(display(""), "");
        assert_eq!(display("2024030112"), "2024030112");
    }

    #[test]
    fn key_for_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(key_for(date), "20240301");
        assert_eq!(parse_key("20240301"), Some(date));
    }
}
