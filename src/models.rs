use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayStatus {
    #[default]
    Unset,
    Completed,
    Failed,
}

/// Which status a toggle request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Completed,
    Failed,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    fn status(self) -> DayStatus {
        match self {
            Self::Completed => DayStatus::Completed,
            Self::Failed => DayStatus::Failed,
        }
    }
}

impl FromStr for StatusKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err("kind must be 'completed' or 'failed'".to_string()),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and note for one calendar day.
///
/// Serialized as `{completed, failed, note}`; both flags are never set at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DayRecordWire", into = "DayRecordWire")]
pub struct DayRecord {
    pub status: DayStatus,
    pub note: String,
}

impl DayRecord {
    pub fn is_completed(&self) -> bool {
        self.status == DayStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == DayStatus::Failed
    }

    /// Flips `kind` on or off. Whatever the outcome, the other status is cleared.
    pub fn toggle(&mut self, kind: StatusKind) {
        let target = kind.status();
        self.status = if self.status == target {
            DayStatus::Unset
        } else {
            target
        };
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DayRecordWire {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    failed: bool,
    #[serde(default)]
    note: String,
}

impl From<DayRecordWire> for DayRecord {
    fn from(wire: DayRecordWire) -> Self {
        let status = if wire.completed {
            DayStatus::Completed
        } else if wire.failed {
            DayStatus::Failed
        } else {
            DayStatus::Unset
        };
        Self {
            status,
            note: wire.note,
        }
    }
}

impl From<DayRecord> for DayRecordWire {
    fn from(record: DayRecord) -> Self {
        Self {
            completed: record.is_completed(),
            failed: record.is_failed(),
            note: record.note,
        }
    }
}

/// Every touched day, keyed by canonical date key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarStore {
    pub days: BTreeMap<String, DayRecord>,
}

impl CalendarStore {
    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date_key(date))
    }

    /// Record for `date`, or the empty record when the day was never touched.
    pub fn record(&self, date: NaiveDate) -> DayRecord {
        self.get(date).cloned().unwrap_or_default()
    }

    pub fn toggle_status(&mut self, date: NaiveDate, kind: StatusKind) -> DayRecord {
        let entry = self.days.entry(date_key(date)).or_default();
        entry.toggle(kind);
        entry.clone()
    }

    pub fn set_note(&mut self, date: NaiveDate, note: impl Into<String>) -> DayRecord {
        let entry = self.days.entry(date_key(date)).or_default();
        entry.note = note.into();
        entry.clone()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a date key, accepting only the canonical zero-padded form.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, DATE_KEY_FORMAT).ok()?;
    (date_key(date) == value).then_some(date)
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MonthForm {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub note: String,
    pub month: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayResponse {
    pub date: String,
    pub completed: bool,
    pub failed: bool,
    pub note: String,
}

impl DayResponse {
    pub fn new(date: NaiveDate, record: &DayRecord) -> Self {
        Self {
            date: date_key(date),
            completed: record.is_completed(),
            failed: record.is_failed(),
            note: record.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MilestoneView {
    pub celebrating: bool,
    pub milestone: Option<u32>,
    pub highest_shown: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub date: String,
    pub streak: u32,
    pub milestone: MilestoneView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub day: DayResponse,
    pub streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub day: DayResponse,
    pub streak: u32,
    pub milestone: MilestoneView,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn completing_a_failed_day_clears_failed() {
        let mut store = CalendarStore::default();
        store.toggle_status(day(4), StatusKind::Failed);
        let record = store.toggle_status(day(4), StatusKind::Completed);
        assert!(record.is_completed());
        assert!(!record.is_failed());
    }

    #[test]
    fn toggling_completed_twice_unsets_it() {
        let mut store = CalendarStore::default();
        store.toggle_status(day(4), StatusKind::Completed);
        let record = store.toggle_status(day(4), StatusKind::Completed);
        assert_eq!(record.status, DayStatus::Unset);
        assert!(store.days.contains_key("2026-03-04"));
    }

    #[test]
    fn toggling_failed_off_keeps_note() {
        let mut store = CalendarStore::default();
        store.set_note(day(9), "rainy");
        store.toggle_status(day(9), StatusKind::Failed);
        let record = store.toggle_status(day(9), StatusKind::Failed);
        assert_eq!(record.status, DayStatus::Unset);
        assert_eq!(record.note, "rainy");
    }

    #[test]
    fn absent_day_reads_as_empty_record() {
        let store = CalendarStore::default();
        assert_eq!(store.record(day(1)), DayRecord::default());
        assert!(store.get(day(1)).is_none());
    }

    #[test]
    fn record_uses_flag_wire_shape() {
        let record = DayRecord {
            status: DayStatus::Failed,
            note: "skipped".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "completed": false, "failed": true, "note": "skipped" })
        );
    }

    #[test]
    fn partial_wire_record_fills_defaults() {
        let record: DayRecord = serde_json::from_str(r#"{"note":"only a note"}"#).unwrap();
        assert_eq!(record.status, DayStatus::Unset);
        assert_eq!(record.note, "only a note");

        let record: DayRecord = serde_json::from_str(r#"{"completed":true,"failed":true}"#).unwrap();
        assert_eq!(record.status, DayStatus::Completed);
    }

    #[test]
    fn kind_parsing_trims_and_rejects_unknown() {
        assert_eq!(" failed ".parse::<StatusKind>(), Ok(StatusKind::Failed));
        assert!("done".parse::<StatusKind>().is_err());
    }

    #[test]
    fn date_keys_are_canonical() {
        assert_eq!(date_key(day(7)), "2026-03-07");
        assert_eq!(parse_date_key("2026-03-07"), Some(day(7)));
        assert!(parse_date_key("2026-3-7").is_none());
        assert!(parse_date_key("2026-02-30").is_none());
        assert!(parse_date_key("yesterday").is_none());
    }
}
