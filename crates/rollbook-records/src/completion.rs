//! Completion log for the daily reminders pass.
//!
//! One record per calendar month tracks which birthday and anniversary
//! greetings were actually sent, so the pass can be re-run without losing
//! track of what is already done.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::Record;

/// Format a date's month key, e.g. `2026-08`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Per-month completion record.
///
/// `birthdays` holds member ids; `anniversaries` holds household keys
/// (the head-of-house name), since an anniversary belongs to the couple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub month: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub birthdays: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anniversaries: Vec<String>,
    #[serde(default = "default_timestamp")]
    pub last_updated: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl CompletionRecord {
    pub fn new(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            birthdays: Vec::new(),
            anniversaries: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Mark a member's birthday greeting done. Returns false if already marked.
    pub fn mark_birthday(&mut self, member_id: &str) -> bool {
        if self.birthdays.iter().any(|id| id == member_id) {
            return false;
        }
        self.birthdays.push(member_id.to_string());
        self.last_updated = Utc::now();
        true
    }

    /// Unmark a member's birthday greeting. Returns false if it was not marked.
    pub fn unmark_birthday(&mut self, member_id: &str) -> bool {
        let before = self.birthdays.len();
        self.birthdays.retain(|id| id != member_id);
        let removed = self.birthdays.len() != before;
        if removed {
            self.last_updated = Utc::now();
        }
        removed
    }

    /// Mark a household's anniversary greeting done. Returns false if already marked.
    pub fn mark_anniversary(&mut self, household: &str) -> bool {
        if self.anniversaries.iter().any(|key| key == household) {
            return false;
        }
        self.anniversaries.push(household.to_string());
        self.last_updated = Utc::now();
        true
    }

    /// Unmark a household's anniversary greeting. Returns false if it was not marked.
    pub fn unmark_anniversary(&mut self, household: &str) -> bool {
        let before = self.anniversaries.len();
        self.anniversaries.retain(|key| key != household);
        let removed = self.anniversaries.len() != before;
        if removed {
            self.last_updated = Utc::now();
        }
        removed
    }

    pub fn birthday_done(&self, member_id: &str) -> bool {
        self.birthdays.iter().any(|id| id == member_id)
    }

    pub fn anniversary_done(&self, household: &str) -> bool {
        self.anniversaries.iter().any(|key| key == household)
    }
}

impl Record for CompletionRecord {
    fn record_id(&self) -> &str {
        &self.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_formats_year_dash_month() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).expect("date should build");
        assert_eq!(month_key(date), "2026-08");
        let january = NaiveDate::from_ymd_opt(2026, 1, 3).expect("date should build");
        assert_eq!(month_key(january), "2026-01");
    }

    #[test]
    fn mark_is_idempotent() {
        let mut record = CompletionRecord::new("2026-08");
        assert!(record.mark_birthday("mbr-1"));
        assert!(!record.mark_birthday("mbr-1"));
        assert_eq!(record.birthdays, vec!["mbr-1".to_string()]);
    }

    #[test]
    fn unmark_removes_only_present_entries() {
        let mut record = CompletionRecord::new("2026-08");
        record.mark_anniversary("Smith, John");
        assert!(record.unmark_anniversary("Smith, John"));
        assert!(!record.unmark_anniversary("Smith, John"));
        assert!(record.anniversaries.is_empty());
    }
}
