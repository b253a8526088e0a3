//! Store-level operations on the monthly completion log.
//!
//! A month only has a record while something is marked in it. Marking
//! creates the record on demand; unmarking the last entry deletes it, so
//! the completions collection never accumulates empty months.

use rollbook_records::{CompletionRecord, RecordStore};

/// Mark a member's birthday greeting done for a month. Returns false if it
/// was already marked.
pub fn mark_birthday_done(
    store: &mut RecordStore<CompletionRecord>,
    month: &str,
    member_id: &str,
) -> bool {
    if let Some(record) = store.get_mut(month) {
        return record.mark_birthday(member_id);
    }
    let mut record = CompletionRecord::new(month);
    record.mark_birthday(member_id);
    store.upsert(record);
    true
}

/// Unmark a member's birthday greeting. Returns false if it was not marked.
pub fn unmark_birthday_done(
    store: &mut RecordStore<CompletionRecord>,
    month: &str,
    member_id: &str,
) -> bool {
    let Some(record) = store.get_mut(month) else {
        return false;
    };
    let removed = record.unmark_birthday(member_id);
    drop_if_empty(store, month);
    removed
}

/// Mark a household's anniversary greeting done for a month. Returns false
/// if it was already marked.
pub fn mark_anniversary_done(
    store: &mut RecordStore<CompletionRecord>,
    month: &str,
    household: &str,
) -> bool {
    if let Some(record) = store.get_mut(month) {
        return record.mark_anniversary(household);
    }
    let mut record = CompletionRecord::new(month);
    record.mark_anniversary(household);
    store.upsert(record);
    true
}

/// Unmark a household's anniversary greeting. Returns false if it was not
/// marked.
pub fn unmark_anniversary_done(
    store: &mut RecordStore<CompletionRecord>,
    month: &str,
    household: &str,
) -> bool {
    let Some(record) = store.get_mut(month) else {
        return false;
    };
    let removed = record.unmark_anniversary(household);
    drop_if_empty(store, month);
    removed
}

fn drop_if_empty(store: &mut RecordStore<CompletionRecord>, month: &str) {
    let empty = store
        .get(month)
        .is_some_and(|record| record.birthdays.is_empty() && record.anniversaries.is_empty());
    if empty {
        let _ = store.remove(month);
    }
}
