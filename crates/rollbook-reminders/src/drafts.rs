//! Reminder drafts for one day's pass.
//!
//! A draft is everything needed to send a greeting by hand: who, the
//! message, the phone to text and a suggested send time. Sending is left
//! to the person holding the phone.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use rollbook_records::{Member, RecordStore, digits_only};

use crate::dates::first_name;
use crate::today::{anniversaries_on, anniversary_phone, birthday_phone, birthdays_on};

/// Draft ids live in a fixed range so a rescheduling pass can cancel the
/// whole previous batch by id.
pub const REMINDER_ID_BASE: u32 = 10000;
pub const REMINDER_ID_MAX: u32 = 19999;

const SEND_HOUR: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Birthday,
    Anniversary,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Birthday => "birthday",
            ReminderKind::Anniversary => "anniversary",
        }
    }
}

/// One greeting to send.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDraft {
    pub id: u32,
    pub kind: ReminderKind,
    pub title: String,
    /// Member preferred name for birthdays, head-of-house for anniversaries.
    pub body: String,
    pub message: String,
    pub phone: String,
    /// Digits-only form used in the sms link.
    pub sms_phone: String,
    pub send_at: NaiveDateTime,
}

impl ReminderDraft {
    /// The `sms:` URL that opens a prefilled text to the right number.
    pub fn sms_link(&self) -> String {
        format!("sms:{}?body={}", self.sms_phone, percent_encode(&self.message))
    }
}

/// Build the day's drafts: birthdays first, then anniversaries, ids
/// assigned sequentially from `REMINDER_ID_BASE`. Celebrants with no
/// resolvable phone are skipped.
pub fn build_reminder_drafts(store: &RecordStore<Member>, on: NaiveDate) -> Vec<ReminderDraft> {
    let send_at = on
        .and_hms_opt(SEND_HOUR, 0, 0)
        .expect("08:00:00 is a valid time");

    let mut drafts = Vec::new();
    let mut next_id = REMINDER_ID_BASE;

    for member in birthdays_on(store, on) {
        if next_id > REMINDER_ID_MAX {
            break;
        }
        let Some(phone) = birthday_phone(member, store) else {
            continue;
        };
        let message = format!(
            "Happy birthday {}! I hope you have a wonderful day!!!",
            first_name(&member.preferred_name)
        );
        drafts.push(ReminderDraft {
            id: next_id,
            kind: ReminderKind::Birthday,
            title: "Birthday".to_string(),
            body: member.preferred_name.clone(),
            message,
            sms_phone: digits_only(&phone),
            phone,
            send_at,
        });
        next_id += 1;
    }

    for group in anniversaries_on(store, on) {
        if next_id > REMINDER_ID_MAX {
            break;
        }
        let Some(phone) = anniversary_phone(&group.head_of_house, store) else {
            continue;
        };
        drafts.push(ReminderDraft {
            id: next_id,
            kind: ReminderKind::Anniversary,
            title: "Anniversary".to_string(),
            body: group.head_of_house.clone(),
            message: "Happy anniversary to you two! I hope you guys have a wonderful day!!!"
                .to_string(),
            sms_phone: digits_only(&phone),
            phone,
            send_at,
        });
        next_id += 1;
    }

    drafts
}

/// Encode a message for the body of an `sms:` URL. Keeps the characters
/// `encodeURIComponent` keeps, so links match what phones expect.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str, house: &str, age: u8) -> Member {
        let mut m = Member::new(id, name, house);
        m.age = age;
        m
    }

    fn on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).expect("date should build")
    }

    #[test]
    fn drafts_put_birthdays_before_anniversaries_with_sequential_ids() {
        let mut ada = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        ada.individual_phone = Some("555-0100".to_string());
        ada.marriage_date = Some("5 Mar 2010".to_string());
        let mut kim = member("mbr-2", "Ng, Kim", "Ng, Kim", 55);
        kim.individual_phone = Some("555-0177".to_string());
        kim.birth_date = Some("5 Mar 1971".to_string());

        let store = RecordStore::from_records(vec![ada, kim]);
        let drafts = build_reminder_drafts(&store, on());

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].id, 10000);
        assert_eq!(drafts[0].kind, ReminderKind::Birthday);
        assert_eq!(drafts[0].body, "Ng, Kim");
        assert_eq!(drafts[1].id, 10001);
        assert_eq!(drafts[1].kind, ReminderKind::Anniversary);
        assert_eq!(drafts[1].body, "Lee, Ada");
    }

    #[test]
    fn celebrant_without_phone_is_skipped() {
        let mut ada = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        ada.birth_date = Some("5 Mar 1985".to_string());

        let store = RecordStore::from_records(vec![ada]);
        assert!(build_reminder_drafts(&store, on()).is_empty());
    }

    #[test]
    fn birthday_message_greets_by_first_name() {
        let mut jen = member("mbr-1", "Wademan, Jennifer", "Wademan, Rich", 35);
        jen.individual_phone = Some("555-0123".to_string());
        jen.birth_date = Some("5 Mar 1991".to_string());

        let store = RecordStore::from_records(vec![jen]);
        let drafts = build_reminder_drafts(&store, on());
        assert_eq!(
            drafts[0].message,
            "Happy birthday Jennifer! I hope you have a wonderful day!!!"
        );
        assert_eq!(drafts[0].send_at.to_string(), "2026-03-05 08:00:00");
    }

    #[test]
    fn sms_link_uses_digits_and_encoded_body() {
        let draft = ReminderDraft {
            id: 10000,
            kind: ReminderKind::Birthday,
            title: "Birthday".to_string(),
            body: "Lee, Ada".to_string(),
            message: "Happy birthday Ada! I hope you have a wonderful day!!!".to_string(),
            phone: "(555) 010-0123".to_string(),
            sms_phone: "5550100123".to_string(),
            send_at: on().and_hms_opt(8, 0, 0).expect("valid time"),
        };
        assert_eq!(
            draft.sms_link(),
            "sms:5550100123?body=Happy%20birthday%20Ada!%20I%20hope%20you%20have%20a%20wonderful%20day!!!"
        );
    }
}
