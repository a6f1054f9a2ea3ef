//! Proximity calculations for upcoming birthdays.
//!
//! Pure date arithmetic with no I/O: days-until-next-occurrence across the
//! year boundary, the "upcoming" window test, proximity-stable sorting, and
//! the presentation label. Everything here is safe to call concurrently from
//! request handlers and from the notification sweep.

use chrono::{Datelike, NaiveDate};

use crate::backend::domain::errors::SweepError;
use crate::backend::domain::models::birthday::Birthday;

/// Days within which a birthday counts as "upcoming" when no explicit
/// threshold is configured.
pub const DEFAULT_UPCOMING_THRESHOLD_DAYS: i64 = 7;

/// Parse an ISO 8601 (YYYY-MM-DD) birthdate, rejecting dates that are not
/// valid calendar dates (Feb 30 and friends).
pub fn parse_birthdate(input: &str) -> Result<NaiveDate, SweepError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| SweepError::InvalidDate(input.trim().to_string()))
}

/// The occurrence of `birthdate`'s month/day in the given year.
///
/// A Feb 29 birthdate is observed on Feb 28 in non-leap years.
fn occurrence_in_year(birthdate: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birthdate.month(), birthdate.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .expect("Feb 28 exists in every year")
}

/// The calendar date on which this birthdate next falls, on or after `today`.
pub fn next_occurrence(birthdate: NaiveDate, today: NaiveDate) -> NaiveDate {
    let candidate = occurrence_in_year(birthdate, today.year());
    if candidate < today {
        occurrence_in_year(birthdate, today.year() + 1)
    } else {
        candidate
    }
}

/// Days until the next occurrence of `birthdate`, seen from `today`.
///
/// Always in `[0, 366]`; `0` means today is the birthday.
pub fn days_until_next_occurrence(birthdate: NaiveDate, today: NaiveDate) -> i64 {
    next_occurrence(birthdate, today)
        .signed_duration_since(today)
        .num_days()
}

/// Whether a birthday this many days away falls inside the upcoming window.
pub fn is_upcoming(days_until: i64, threshold_days: i64) -> bool {
    (0..=threshold_days).contains(&days_until)
}

/// Sort birthdays ascending by days-until-next-occurrence.
///
/// The sort is stable: birthdays the same number of days away keep their
/// input order. The input slice is not mutated.
pub fn sort_by_proximity(birthdays: &[Birthday], today: NaiveDate) -> Vec<Birthday> {
    let mut sorted = birthdays.to_vec();
    sorted.sort_by_key(|b| days_until_next_occurrence(b.birthdate, today));
    sorted
}

/// Presentation label for a birthday, e.g. "4 June (in 3 days)".
pub fn format_proximity_label(birthdate: NaiveDate, days_until: i64) -> String {
    let date = birthdate.format("%-d %B");
    match days_until {
        0 => format!("{} (today)", date),
        1 => format!("{} (in 1 day)", date),
        n => format!("{} (in {} days)", date, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn birthday(id: &str, birthdate: NaiveDate) -> Birthday {
        let now = Utc::now();
        Birthday {
            id: id.to_string(),
            name: id.to_string(),
            birthdate,
            message: None,
            group_id: "group::1".to_string(),
            notified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_birthday_later_this_year() {
        // Scenario A: three days out
        let days = days_until_next_occurrence(date(1990, 6, 4), date(2024, 6, 1));
        assert_eq!(days, 3);
        assert!(is_upcoming(days, 7));
    }

    #[test]
    fn test_birthday_already_passed_rolls_to_next_year() {
        // Scenario B: Jan 10 seen from Jun 1 is next year's occurrence
        let days = days_until_next_occurrence(date(1985, 1, 10), date(2024, 6, 1));
        assert_eq!(days, 223);
        assert!(!is_upcoming(days, 7));
    }

    #[test]
    fn test_birthday_today_is_zero() {
        assert_eq!(days_until_next_occurrence(date(2000, 6, 1), date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_birthday_yesterday_is_almost_a_year_away() {
        let days = days_until_next_occurrence(date(2000, 5, 31), date(2024, 6, 1));
        // 2025 occurrence, 364 days from 2024-06-01
        assert_eq!(days, 364);
    }

    #[test]
    fn test_days_until_always_in_range() {
        let birthdates = [
            date(1990, 1, 1),
            date(1990, 2, 28),
            date(1992, 2, 29),
            date(1990, 6, 15),
            date(1990, 12, 31),
        ];
        let todays = [
            date(2023, 1, 1),
            date(2024, 2, 29),
            date(2024, 6, 1),
            date(2024, 12, 31),
            date(2025, 3, 1),
        ];
        for b in &birthdates {
            for t in &todays {
                let days = days_until_next_occurrence(*b, *t);
                assert!((0..=366).contains(&days), "{} from {} gave {}", b, t, days);
                // Pure function: same inputs, same output
                assert_eq!(days, days_until_next_occurrence(*b, *t));
            }
        }
    }

    #[test]
    fn test_feb_29_observed_on_feb_28_in_non_leap_years() {
        let leapling = date(1992, 2, 29);
        assert_eq!(next_occurrence(leapling, date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(days_until_next_occurrence(leapling, date(2023, 2, 28)), 0);
        // Leap years keep the real date
        assert_eq!(next_occurrence(leapling, date(2024, 2, 1)), date(2024, 2, 29));
    }

    #[test]
    fn test_is_upcoming_window_bounds() {
        for d in 0..=7 {
            assert!(is_upcoming(d, 7), "{} should be upcoming", d);
        }
        assert!(!is_upcoming(8, 7));
        assert!(!is_upcoming(-1, 7));
        assert!(!is_upcoming(365, 7));
    }

    #[test]
    fn test_sort_by_proximity_orders_ascending() {
        let today = date(2024, 6, 1);
        let input = vec![
            birthday("far", date(1990, 1, 10)),
            birthday("today", date(1990, 6, 1)),
            birthday("soon", date(1990, 6, 4)),
        ];

        let sorted = sort_by_proximity(&input, today);

        let ids: Vec<&str> = sorted.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["today", "soon", "far"]);

        let days: Vec<i64> = sorted
            .iter()
            .map(|b| days_until_next_occurrence(b.birthdate, today))
            .collect();
        assert!(days.windows(2).all(|w| w[0] <= w[1]));

        // Input untouched
        assert_eq!(input[0].id, "far");
    }

    #[test]
    fn test_sort_by_proximity_is_stable_on_ties() {
        let today = date(2024, 6, 1);
        // Same month/day, different birth years: identical proximity
        let input = vec![
            birthday("first", date(1980, 6, 4)),
            birthday("second", date(1995, 6, 4)),
            birthday("third", date(2001, 6, 4)),
        ];

        let sorted = sort_by_proximity(&input, today);
        let ids: Vec<&str> = sorted.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_parse_birthdate() {
        assert_eq!(parse_birthdate("1990-06-04").unwrap(), date(1990, 6, 4));
        assert_eq!(parse_birthdate(" 1990-06-04 ").unwrap(), date(1990, 6, 4));
        assert!(parse_birthdate("1990-02-30").is_err());
        assert!(parse_birthdate("1990-13-01").is_err());
        assert!(parse_birthdate("04/06/1990").is_err());
        assert!(parse_birthdate("not-a-date").is_err());
    }

    #[test]
    fn test_format_proximity_label() {
        assert_eq!(format_proximity_label(date(1990, 6, 4), 3), "4 June (in 3 days)");
        assert_eq!(format_proximity_label(date(1990, 6, 4), 1), "4 June (in 1 day)");
        assert_eq!(format_proximity_label(date(1990, 6, 4), 0), "4 June (today)");
    }
}
