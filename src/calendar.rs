use crate::models::{date_key, CalendarStore};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar month, held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    first: NaiveDate,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days().last().copied().unwrap_or(self.first)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        let month = self.month();
        self.first
            .iter_days()
            .take_while(|day| day.month() == month)
            .collect()
    }

    /// Moves by `delta` months. Past chrono's representable range the month
    /// is returned unchanged.
    pub fn shift(self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        shifted.map(|first| Self { first }).unwrap_or(self)
    }

    pub fn prev(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    /// Blank cells before the 1st in a Sunday-first grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthRef {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let invalid = || format!("month must be formatted as YYYY-MM, got '{value}'");
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: String,
    pub day: u32,
    pub label: String,
    pub in_month: bool,
    pub is_today: bool,
    pub completed: bool,
    pub failed: bool,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: String,
    pub label: String,
    pub prev: String,
    pub next: String,
    pub leading_blanks: u32,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<DayCell>,
}

pub fn build_month_view(store: &CalendarStore, month: MonthRef, today: NaiveDate) -> MonthView {
    let cells = month
        .days()
        .into_iter()
        .map(|day| {
            let record = store.record(day);
            DayCell {
                date: date_key(day),
                day: day.day(),
                label: day_label(day),
                in_month: month.contains(day),
                is_today: day == today,
                completed: record.is_completed(),
                failed: record.is_failed(),
                note: record.note,
            }
        })
        .collect();

    MonthView {
        month: month.key(),
        label: month.label(),
        prev: month.prev().key(),
        next: month.next().key(),
        leading_blanks: month.leading_blanks(),
        weekdays: WEEKDAY_LABELS,
        cells,
    }
}

pub fn day_label(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusKind;

    fn october() -> MonthRef {
        MonthRef::new(2026, 10).unwrap()
    }

    #[test]
    fn twelve_forward_twelve_back_is_identity() {
        let start = october();
        let mut month = start;
        for _ in 0..12 {
            month = month.next();
        }
        assert_eq!(month, MonthRef::new(2027, 10).unwrap());
        for _ in 0..12 {
            month = month.prev();
        }
        assert_eq!(month, start);
        assert_eq!(start.shift(-25).key(), "2024-09");
    }

    #[test]
    fn month_bounds_and_offset() {
        let month = october();
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert_eq!(month.last_day(), NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());
        assert_eq!(month.days().len(), 31);
        // October 1st 2026 is a Thursday
        assert_eq!(month.leading_blanks(), 4);

        let feb = MonthRef::new(2024, 2).unwrap();
        assert_eq!(feb.days().len(), 29);
        assert_eq!(feb.leading_blanks(), 4);
    }

    #[test]
    fn parses_and_prints_month_keys() {
        assert_eq!("2026-10".parse::<MonthRef>(), Ok(october()));
        assert_eq!(october().to_string(), "2026-10");
        assert_eq!(october().label(), "October 2026");
        assert!("2026-13".parse::<MonthRef>().is_err());
        assert!("2026-1".parse::<MonthRef>().is_err());
        assert!("october".parse::<MonthRef>().is_err());
        assert!("+202-10".parse::<MonthRef>().is_err());
        assert!("2026-+1".parse::<MonthRef>().is_err());
    }

    #[test]
    fn containing_snaps_to_first_day() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(MonthRef::containing(date), october());
    }

    #[test]
    fn month_view_binds_records_to_cells() {
        let mut store = CalendarStore::default();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        store.toggle_status(today, StatusKind::Completed);
        store.toggle_status(NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(), StatusKind::Failed);
        store.set_note(NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(), "travel");
        store.toggle_status(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(), StatusKind::Completed);

        let view = build_month_view(&store, october(), today);
        assert_eq!(view.month, "2026-10");
        assert_eq!(view.prev, "2026-09");
        assert_eq!(view.next, "2026-11");
        assert_eq!(view.leading_blanks, 4);
        assert_eq!(view.cells.len(), 31);
        assert!(view.cells.iter().all(|cell| cell.in_month));

        let third = &view.cells[2];
        assert_eq!(third.date, "2026-10-03");
        assert_eq!(third.label, "October 3, 2026");
        assert!(third.failed && !third.completed);
        assert_eq!(third.note, "travel");

        let seventeenth = &view.cells[16];
        assert!(seventeenth.is_today && seventeenth.completed);
        assert_eq!(view.cells.iter().filter(|cell| cell.completed).count(), 1);
    }
}
