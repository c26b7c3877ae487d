use crate::models::CalendarStore;
use chrono::{Local, NaiveDate};

pub fn current_streak(store: &CalendarStore) -> u32 {
    streak_at(store, Local::now().date_naive())
}

/// Counts completed days walking backward from `today`, stopping at the first
/// day that is absent, unset or failed.
pub fn streak_at(store: &CalendarStore, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut day = today;
    while store.get(day).is_some_and(|record| record.is_completed()) {
        streak = streak.saturating_add(1);
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusKind;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn empty_store_has_no_streak() {
        assert_eq!(streak_at(&CalendarStore::default(), today()), 0);
    }

    #[test]
    fn counts_back_to_first_absent_day() {
        let mut store = CalendarStore::default();
        for offset in 0..5 {
            store.toggle_status(today() - Duration::days(offset), StatusKind::Completed);
        }
        // gap at offset 5, then more history that must not count
        store.toggle_status(today() - Duration::days(6), StatusKind::Completed);
        assert_eq!(streak_at(&store, today()), 5);
    }

    #[test]
    fn failed_or_unset_day_breaks_streak() {
        let mut store = CalendarStore::default();
        store.toggle_status(today(), StatusKind::Completed);
        store.toggle_status(today() - Duration::days(1), StatusKind::Failed);
        store.toggle_status(today() - Duration::days(2), StatusKind::Completed);
        assert_eq!(streak_at(&store, today()), 1);

        store.set_note(today() - Duration::days(1), "note only");
        store.toggle_status(today() - Duration::days(1), StatusKind::Failed);
        assert_eq!(streak_at(&store, today()), 1);
    }

    #[test]
    fn streak_requires_today_completed() {
        let mut store = CalendarStore::default();
        store.toggle_status(today() - Duration::days(1), StatusKind::Completed);
        assert_eq!(streak_at(&store, today()), 0);
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let mut store = CalendarStore::default();
        for offset in 0..40 {
            store.toggle_status(today() - Duration::days(offset), StatusKind::Completed);
        }
        assert_eq!(streak_at(&store, today()), 40);
    }
}
