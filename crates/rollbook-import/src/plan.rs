//! Dedup import: plan and apply rows against the member store.
//!
//! Rows key on `preferred_name|head_of_house`. A row whose key matches an
//! existing member updates that member in place (same id, `created_at`
//! preserved); a matching content hash means nothing changed and nothing
//! is written. Everything else creates a new member.

use chrono::{DateTime, Utc};
use rollbook_records::member::{Member, next_member_id};
use rollbook_records::memory::RecordStore;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::rows::ImportRow;
use crate::validate::validate_rows;

/// One member an import would create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMember {
    pub id: String,
    pub preferred_name: String,
    pub head_of_house: String,
}

impl PlannedMember {
    fn of(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            preferred_name: member.preferred_name.clone(),
            head_of_house: member.head_of_house.clone(),
        }
    }
}

/// What an import did (or would do, for a dry run).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportPlan {
    pub created: Vec<PlannedMember>,
    pub updated: Vec<PlannedMember>,
    pub unchanged: usize,
    pub errors: Vec<String>,
}

/// Plan an import without touching the store.
pub fn plan_import(
    store: &RecordStore<Member>,
    rows: &[ImportRow],
    now: DateTime<Utc>,
    current_year: i32,
) -> ImportPlan {
    // Planning is applying to a scratch copy; the copy is dropped.
    let mut scratch = store.clone();
    apply_import(&mut scratch, rows, now, current_year)
}

/// Apply rows to the store. Returns what happened; the caller persists.
pub fn apply_import(
    store: &mut RecordStore<Member>,
    rows: &[ImportRow],
    now: DateTime<Utc>,
    current_year: i32,
) -> ImportPlan {
    let mut plan = ImportPlan {
        errors: validate_rows(rows),
        ..ImportPlan::default()
    };

    // identity key -> id, updated as creates land so duplicate rows in
    // one batch collapse onto the first instead of duplicating members.
    let mut index: BTreeMap<String, String> = store
        .records()
        .map(|member| (member.identity_key(), member.id.clone()))
        .collect();

    for row in rows {
        let key = row.identity_key();
        match index.get(&key) {
            Some(existing_id) => {
                let existing = match store.get(existing_id) {
                    Some(member) => member,
                    None => continue,
                };
                let incoming = row.to_member(existing_id.clone(), now, current_year);
                if existing.content_hash() == incoming.content_hash() {
                    plan.unchanged += 1;
                    continue;
                }
                let mut updated = incoming;
                updated.created_at = existing.created_at;
                updated.updated_at = now;
                plan.updated.push(PlannedMember::of(&updated));
                store.upsert(updated);
            }
            None => {
                let id = next_member_id(store);
                let member = row.to_member(id.clone(), now, current_year);
                index.insert(key, id);
                plan.created.push(PlannedMember::of(&member));
                store.upsert(member);
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(name: &str, house: &str, age: &str) -> ImportRow {
        ImportRow {
            preferred_name: name.to_string(),
            head_of_house: house.to_string(),
            age: age.to_string(),
            ..ImportRow::default()
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_rows_create_members_with_sequential_ids() {
        let mut store = RecordStore::default();
        let rows = vec![
            row("Smith, Jane", "Smith, John", "34"),
            row("Lee, Ben", "Lee, Ben", "29"),
        ];
        let plan = apply_import(&mut store, &rows, fixed_now(), 2026);
        assert_eq!(plan.created.len(), 2);
        assert_eq!(plan.created[0].id, "mbr-1");
        assert_eq!(plan.created[1].id, "mbr-2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn matching_key_updates_and_preserves_created_at() {
        let mut store = RecordStore::default();
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut existing = Member::new("mbr-7", "Smith, Jane", "Smith, John");
        existing.age = 33;
        existing.created_at = created;
        existing.updated_at = created;
        store.upsert(existing);

        let plan = apply_import(
            &mut store,
            &[row("Smith, Jane", "Smith, John", "34")],
            fixed_now(),
            2026,
        );
        assert_eq!(plan.updated.len(), 1);
        assert_eq!(plan.updated[0].id, "mbr-7");
        assert!(plan.created.is_empty());

        let member = store.get("mbr-7").expect("member must exist");
        assert_eq!(member.age, 34);
        assert_eq!(member.created_at, created);
        assert_eq!(member.updated_at, fixed_now());
    }

    #[test]
    fn identical_content_counts_as_unchanged() {
        let mut store = RecordStore::default();
        let rows = vec![row("Smith, Jane", "Smith, John", "34")];
        apply_import(&mut store, &rows, fixed_now(), 2026);
        let before = store.get("mbr-1").expect("member must exist").updated_at;

        let later = fixed_now() + chrono::Duration::days(1);
        let plan = apply_import(&mut store, &rows, later, 2026);
        assert_eq!(plan.unchanged, 1);
        assert!(plan.created.is_empty() && plan.updated.is_empty());
        assert_eq!(
            store.get("mbr-1").expect("member must exist").updated_at,
            before
        );
    }

    #[test]
    fn duplicate_rows_in_one_batch_collapse() {
        let mut store = RecordStore::default();
        let rows = vec![
            row("Smith, Jane", "Smith, John", "34"),
            row("Smith, Jane", "Smith, John", "35"),
        ];
        let plan = apply_import(&mut store, &rows, fixed_now(), 2026);
        assert_eq!(plan.created.len(), 1);
        assert_eq!(plan.updated.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("mbr-1").expect("member must exist").age, 35);
    }

    #[test]
    fn plan_leaves_the_store_untouched() {
        let store = RecordStore::default();
        let plan = plan_import(
            &store,
            &[row("Smith, Jane", "Smith, John", "34")],
            fixed_now(),
            2026,
        );
        assert_eq!(plan.created.len(), 1);
        assert_eq!(plan.created[0].id, "mbr-1");
        assert!(store.is_empty());
    }

    #[test]
    fn validation_problems_ride_along() {
        let mut store = RecordStore::default();
        let plan = apply_import(
            &mut store,
            &[row("Smith, Jane", "Smith, John", "999")],
            fixed_now(),
            2026,
        );
        assert_eq!(plan.errors, vec!["Row 1: Invalid age: 999".to_string()]);
        // The row still imports, with the age defaulted.
        assert_eq!(store.get("mbr-1").expect("member must exist").age, 0);
    }
}
