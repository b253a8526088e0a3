//! Family type: one work list per household.
//!
//! A family mirrors a household (same head-of-house key) but carries
//! mutable coordination state: member id list, todo items, a weekly review
//! day, notes. Households themselves are derived views and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::memory::Record;

/// Weekday a family's situation is reviewed on. Weekends are never assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl ReviewDay {
    /// Round-robin assignment order.
    pub const ALL: [ReviewDay; 5] = [
        ReviewDay::Monday,
        ReviewDay::Tuesday,
        ReviewDay::Wednesday,
        ReviewDay::Thursday,
        ReviewDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDay::Monday => "monday",
            ReviewDay::Tuesday => "tuesday",
            ReviewDay::Wednesday => "wednesday",
            ReviewDay::Thursday => "thursday",
            ReviewDay::Friday => "friday",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "monday" => Some(ReviewDay::Monday),
            "tuesday" => Some(ReviewDay::Tuesday),
            "wednesday" => Some(ReviewDay::Wednesday),
            "thursday" => Some(ReviewDay::Thursday),
            "friday" => Some(ReviewDay::Friday),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Todo priority. Ordering is high before medium before low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

impl TodoPriority {
    /// Numeric rank for sorting; higher sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            TodoPriority::High => 3,
            TodoPriority::Medium => 2,
            TodoPriority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(TodoPriority::Low),
            "medium" => Some(TodoPriority::Medium),
            "high" => Some(TodoPriority::High),
            _ => None,
        }
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One todo item on a family's work list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    pub priority: TodoPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        priority: TodoPriority,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            category: category.into(),
            priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// A family work list keyed by household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub head_of_household: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todo_items: Vec<TodoItem>,
    pub review_day: ReviewDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_timestamp")]
    pub last_updated: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl Family {
    pub fn new(
        head_of_household: impl Into<String>,
        review_day: ReviewDay,
        member_ids: Vec<String>,
    ) -> Self {
        let head_of_household = head_of_household.into();
        Self {
            id: family_id_for_household(&head_of_household),
            head_of_household,
            member_ids,
            todo_items: Vec::new(),
            review_day,
            notes: None,
            last_updated: Utc::now(),
        }
    }

    /// Lookup a todo item by id.
    pub fn todo(&self, todo_id: &str) -> Option<&TodoItem> {
        self.todo_items.iter().find(|item| item.id == todo_id)
    }

    /// Lookup a todo item by id (mutable).
    pub fn todo_mut(&mut self, todo_id: &str) -> Option<&mut TodoItem> {
        self.todo_items.iter_mut().find(|item| item.id == todo_id)
    }

    pub fn touch_last_updated(&mut self) {
        self.last_updated = Utc::now();
    }
}

impl Record for Family {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Derive the stable family id for a household name.
///
/// Whitespace runs collapse to `-` and the result is lowercased, so
/// `"Smith, John"` becomes `family-smith,-john`. Punctuation is kept; the
/// id only has to be stable and filesystem-safe enough for JSON keys.
pub fn family_id_for_household(head_of_household: &str) -> String {
    let slug = head_of_household
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("family-{slug}")
}
