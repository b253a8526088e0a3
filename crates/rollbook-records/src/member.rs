//! Member type: the primary record in rollbook-records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::ContentHash;
use crate::memory::{Record, RecordStore};

/// Member gender as LCR reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }

    /// Parse an already-normalized gender cell. Only `"M"` and `"F"` parse.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "M" => Some(Gender::M),
            "F" => Some(Gender::F),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member: one person on the congregation roll.
///
/// Members group into households by `head_of_house`; the household views
/// and family work lists are derived from that key, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    // ── Core identification ──
    pub id: String,
    pub preferred_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub head_of_house: String,

    // ── Contact ──
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_street_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_email: Option<String>,

    // ── Vitals ──
    #[serde(default)]
    pub age: u8,
    #[serde(default = "default_gender")]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthplace: Option<String>,

    // ── Church record ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priesthood_office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temple_recommend_expiration_date: Option<String>,

    // ── Timestamps ──
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_gender() -> Gender {
    Gender::M
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl Member {
    /// Construct a member with the given identity and default vitals.
    pub fn new(
        id: impl Into<String>,
        preferred_name: impl Into<String>,
        head_of_house: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            preferred_name: preferred_name.into(),
            head_of_house: head_of_house.into(),
            address_street_1: String::new(),
            individual_phone: None,
            individual_email: None,
            age: 0,
            gender: Gender::M,
            birth_date: None,
            birth_day: None,
            birth_month: None,
            birth_year: None,
            birthplace: None,
            baptism_date: None,
            callings: Vec::new(),
            marriage_date: None,
            priesthood_office: None,
            temple_recommend_expiration_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The import dedup key: `preferred_name|head_of_house`.
    ///
    /// Two rows with the same key describe the same person; import updates
    /// rather than duplicates.
    pub fn identity_key(&self) -> String {
        format!("{}|{}", self.preferred_name, self.head_of_house)
    }

    /// Compute the content hash of substantive fields.
    ///
    /// Excludes: id, timestamps. Those are volatile fields that can change
    /// without changing the roster facts the record carries.
    pub fn content_hash(&self) -> ContentHash {
        let mut builder = ContentHash::builder()
            .field("preferred_name", &self.preferred_name)
            .field("head_of_house", &self.head_of_house)
            .field("address_street_1", &self.address_street_1)
            .field_opt("individual_phone", self.individual_phone.as_deref())
            .field_opt("individual_email", self.individual_email.as_deref())
            .field_int("age", self.age as i64)
            .field("gender", self.gender.as_str())
            .field_opt("birth_date", self.birth_date.as_deref())
            .field_opt("birth_month", self.birth_month.as_deref())
            .field_opt("birthplace", self.birthplace.as_deref())
            .field_opt("baptism_date", self.baptism_date.as_deref())
            .field_opt("marriage_date", self.marriage_date.as_deref())
            .field_opt("priesthood_office", self.priesthood_office.as_deref())
            .field_opt(
                "temple_recommend_expiration_date",
                self.temple_recommend_expiration_date.as_deref(),
            );
        if let Some(day) = self.birth_day {
            builder = builder.field_int("birth_day", day as i64);
        }
        if let Some(year) = self.birth_year {
            builder = builder.field_int("birth_year", year as i64);
        }
        for calling in &self.callings {
            builder = builder.field("calling", calling);
        }
        builder.finish()
    }
}

impl Record for Member {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Allocate the next free sequential member id (`mbr-1`, `mbr-2`, …).
pub fn next_member_id(store: &RecordStore<Member>) -> String {
    let mut seq = store.len() + 1;
    loop {
        let candidate = format!("mbr-{seq}");
        if store.get(&candidate).is_none() {
            return candidate;
        }
        seq += 1;
    }
}
