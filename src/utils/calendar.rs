// src/utils/calendar.rs

//! Business-day bulletin numbering.
//!
//! The BOC publishes one issue per weekday and names its PDFs by a running
//! issue number instead of a date. Numbers are derived from a fixed anchor
//! `(date, number)`: every weekday after the anchor adds one. Weekend dates
//! resolve to the number of the preceding Friday.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Anchor pair from which all bulletin numbers are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletinCalendar {
    /// Date of the anchor issue
    pub anchor_date: NaiveDate,

    /// Issue number published on `anchor_date`
    pub anchor_number: u32,
}

impl BulletinCalendar {
    pub fn new(anchor_date: NaiveDate, anchor_number: u32) -> Self {
        Self {
            anchor_date,
            anchor_number,
        }
    }

    /// Bulletin number for `date`.
    ///
    /// Saturdays and Sundays alias to the preceding Friday.
    pub fn number_for_date(&self, date: NaiveDate) -> Result<u32> {
        self.ensure_in_range(date)?;

        let back = match date.weekday() {
            Weekday::Sat => 1,
            Weekday::Sun => 2,
            _ => 0,
        };
        let target = date.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        self.ensure_in_range(target)?;

        u32::try_from(weekdays_between(self.anchor_date, target))
            .ok()
            .and_then(|count| self.anchor_number.checked_add(count))
            .ok_or_else(|| {
                AppError::validation(format!("Bulletin number for {date} overflows"))
            })
    }

    /// Weekday on which bulletin `number` was published.
    pub fn date_for_number(&self, number: u32) -> Result<NaiveDate> {
        let Some(steps) = number.checked_sub(self.anchor_number) else {
            return Err(AppError::validation(format!(
                "Bulletin number {number} precedes the anchor number {}",
                self.anchor_number
            )));
        };
        if steps == 0 {
            return Ok(self.anchor_date);
        }

        let out_of_range =
            || AppError::validation(format!("Bulletin number {number} is out of range"));

        // Any seven consecutive days hold exactly five weekdays.
        let weeks = (steps - 1) / 5;
        let mut remaining = steps - weeks * 5;
        let mut current = self
            .anchor_date
            .checked_add_days(Days::new(u64::from(weeks) * 7))
            .ok_or_else(out_of_range)?;
        while remaining > 0 {
            current = current.succ_opt().ok_or_else(out_of_range)?;
            if !is_weekend(current) {
                remaining -= 1;
            }
        }
        Ok(current)
    }

    fn ensure_in_range(&self, date: NaiveDate) -> Result<()> {
        if date < self.anchor_date {
            return Err(AppError::CalendarRange {
                date,
                anchor: self.anchor_date,
            });
        }
        Ok(())
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays in `[start, end)`.
fn weekdays_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days();
    if days <= 0 {
        return 0;
    }
    let offset = i64::from(start.weekday().num_days_from_monday());
    let full_weeks = days / 7;
    let tail = (0..days % 7)
        .filter(|d| (offset + d) % 7 < 5)
        .count() as i64;
    full_weeks * 5 + tail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> BulletinCalendar {
        BulletinCalendar::new(ymd(2025, 1, 2), 1)
    }

    #[test]
    fn numbers_follow_business_days() {
        let cal = calendar();
        assert_eq!(cal.number_for_date(ymd(2025, 1, 2)).unwrap(), 1);
        assert_eq!(cal.number_for_date(ymd(2025, 1, 3)).unwrap(), 2);
        assert_eq!(cal.number_for_date(ymd(2025, 1, 4)).unwrap(), 2);
        assert_eq!(cal.number_for_date(ymd(2025, 1, 6)).unwrap(), 3);
    }

    #[test]
    fn weekend_aliases_to_friday() {
        let cal = calendar();
        let friday = cal.number_for_date(ymd(2025, 3, 14)).unwrap();
        assert_eq!(cal.number_for_date(ymd(2025, 3, 15)).unwrap(), friday);
        assert_eq!(cal.number_for_date(ymd(2025, 3, 16)).unwrap(), friday);
    }

    #[test]
    fn date_before_anchor_is_out_of_range() {
        let err = calendar().number_for_date(ymd(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::CalendarRange { .. }));
    }

    #[test]
    fn round_trips_every_weekday_for_two_years() {
        let cal = calendar();
        let mut date = ymd(2025, 1, 2);
        let mut previous: Option<u32> = None;
        while date < ymd(2027, 1, 2) {
            if !is_weekend(date) {
                let number = cal.number_for_date(date).unwrap();
                assert_eq!(cal.date_for_number(number).unwrap(), date);
                if let Some(prev) = previous {
                    assert!(prev < number, "numbers must increase at {date}");
                }
                previous = Some(number);
            }
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn monday_number_maps_back_to_monday() {
        let cal = calendar();
        assert_eq!(cal.date_for_number(3).unwrap(), ymd(2025, 1, 6));
    }

    #[test]
    fn weekday_count_matches_day_by_day_walk() {
        let start = ymd(2025, 1, 2);
        let mut walked = 0;
        let mut date = start;
        for _ in 0..400 {
            assert_eq!(weekdays_between(start, date), walked, "at {date}");
            if !is_weekend(date) {
                walked += 1;
            }
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn large_anchor_number_does_not_overflow() {
        let cal = BulletinCalendar::new(ymd(2025, 1, 2), u32::MAX - 1);
        assert_eq!(cal.number_for_date(ymd(2025, 1, 3)).unwrap(), u32::MAX);
        assert!(cal.number_for_date(ymd(2025, 1, 6)).is_err());
        assert_eq!(cal.date_for_number(u32::MAX).unwrap(), ymd(2025, 1, 3));
    }

    #[test]
    fn far_numbers_resolve_without_walking_every_day() {
        let cal = calendar();
        let date = ymd(2125, 3, 12);
        let number = cal.number_for_date(date).unwrap();
        assert_eq!(cal.date_for_number(number).unwrap(), date);
    }

    #[test]
    fn number_before_anchor_is_rejected() {
        let cal = BulletinCalendar::new(ymd(2025, 1, 2), 5);
        assert!(cal.date_for_number(4).is_err());
        assert_eq!(cal.date_for_number(5).unwrap(), ymd(2025, 1, 2));
    }
}
