//! Family work-list operations and joined views.
//!
//! Families are stored records (see `rollbook_records::Family`) but almost
//! every read wants them joined against the member store. The join also
//! self-heals: imports can reassign member ids, and a family whose stored
//! ids no longer resolve is regrouped by household name on the next read.

use serde::Serialize;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rollbook_records::{
    Family, Member, RecordStore, ReviewDay, TodoItem, TodoPriority, family_id_for_household,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FamilyOpError {
    #[error("family not found: {0}")]
    FamilyNotFound(String),
    #[error("todo item not found: {0}")]
    TodoNotFound(String),
}

/// Member fields carried into a family view.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyMemberDetail {
    pub id: String,
    pub preferred_name: String,
    pub birth_date: Option<String>,
    pub age: u8,
    pub address_street_1: String,
    pub individual_phone: Option<String>,
    pub individual_email: Option<String>,
}

impl FamilyMemberDetail {
    fn of(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            preferred_name: member.preferred_name.clone(),
            birth_date: member.birth_date.clone(),
            age: member.age,
            address_street_1: member.address_street_1.clone(),
            individual_phone: member.individual_phone.clone(),
            individual_email: member.individual_email.clone(),
        }
    }
}

/// A family joined against the member store, members oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyWithMembers {
    pub id: String,
    pub head_of_household: String,
    pub members: Vec<FamilyMemberDetail>,
    pub todo_items: Vec<TodoItem>,
    pub review_day: ReviewDay,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub address: Option<String>,
}

/// One todo item flattened out of its family for the cross-family list.
#[derive(Debug, Clone, Serialize)]
pub struct TodoView {
    pub id: String,
    pub title: String,
    pub priority: TodoPriority,
    pub completed: bool,
    pub family_name: String,
    pub family_id: String,
}

/// Todo items grouped under one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTodos {
    pub category: String,
    pub items: Vec<TodoView>,
}

/// What `repair_families` did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepairOutcome {
    pub removed: Vec<String>,
    pub created: Vec<String>,
}

/// Create one family per household, skipping households that already have
/// one. Review days rotate Monday through Friday over the sorted household
/// list, and a skipped household still consumes its slot in the rotation,
/// so re-running init never reshuffles existing assignments.
pub fn init_families(
    members: &RecordStore<Member>,
    families: &mut RecordStore<Family>,
) -> Vec<String> {
    let mut by_house: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for member in members.records() {
        by_house
            .entry(member.head_of_house.clone())
            .or_default()
            .push(member.id.clone());
    }

    let mut created = Vec::new();
    for (i, (household, member_ids)) in by_house.into_iter().enumerate() {
        let family_id = family_id_for_household(&household);
        if families.get(&family_id).is_some() {
            continue;
        }
        let review_day = ReviewDay::ALL[i % ReviewDay::ALL.len()];
        let family = Family::new(household, review_day, member_ids);
        created.push(family.id.clone());
        families.upsert(family);
    }
    created
}

/// All families joined against the member store, sorted by head of
/// household, members oldest first.
///
/// Families whose stored member ids no longer resolve at all are regrouped
/// by household name in place. The returned flag tells the caller whether
/// any family record changed and should be persisted.
pub fn families_with_members(
    families: &mut RecordStore<Family>,
    members: &RecordStore<Member>,
) -> (Vec<FamilyWithMembers>, bool) {
    let mut changed = false;

    let ids: Vec<String> = families.records().map(|f| f.id.clone()).collect();
    for id in &ids {
        let Some(family) = families.get_mut(id) else {
            continue;
        };
        let any_resolve = family
            .member_ids
            .iter()
            .any(|member_id| members.get(member_id).is_some());
        if any_resolve {
            continue;
        }
        let regrouped: Vec<String> = members
            .records()
            .filter(|m| m.head_of_house == family.head_of_household)
            .map(|m| m.id.clone())
            .collect();
        if !regrouped.is_empty() {
            family.member_ids = regrouped;
            family.touch_last_updated();
            changed = true;
        }
    }

    let mut views: Vec<FamilyWithMembers> = families
        .records()
        .map(|family| family_view(family, members))
        .collect();
    views.sort_by(|a, b| a.head_of_household.cmp(&b.head_of_household));
    (views, changed)
}

fn family_view(family: &Family, members: &RecordStore<Member>) -> FamilyWithMembers {
    let resolved: Vec<&Member> = family
        .member_ids
        .iter()
        .filter_map(|id| members.get(id))
        .collect();

    let mut details: Vec<FamilyMemberDetail> =
        resolved.iter().map(|m| FamilyMemberDetail::of(m)).collect();
    details.sort_by(|a, b| b.age.cmp(&a.age));

    let address = resolved
        .iter()
        .find(|m| !m.address_street_1.trim().is_empty())
        .map(|m| m.address_street_1.clone());

    FamilyWithMembers {
        id: family.id.clone(),
        head_of_household: family.head_of_household.clone(),
        members: details,
        todo_items: family.todo_items.clone(),
        review_day: family.review_day,
        notes: family.notes.clone(),
        last_updated: family.last_updated,
        address,
    }
}

/// Delete families whose member id lists reference unknown members, then
/// recreate families for any household that lacks one. A family with an
/// empty id list is left alone.
pub fn repair_families(
    families: &mut RecordStore<Family>,
    members: &RecordStore<Member>,
) -> RepairOutcome {
    let corrupt: Vec<String> = families
        .records()
        .filter(|family| {
            !family.member_ids.is_empty()
                && family
                    .member_ids
                    .iter()
                    .any(|id| members.get(id).is_none())
        })
        .map(|family| family.id.clone())
        .collect();

    let mut outcome = RepairOutcome::default();
    for id in corrupt {
        if families.remove(&id).is_ok() {
            outcome.removed.push(id);
        }
    }
    outcome.created = init_families(members, families);
    outcome
}

/// Add a todo item, returning the stored item (with its fresh id).
pub fn add_todo(
    families: &mut RecordStore<Family>,
    family_id: &str,
    title: impl Into<String>,
    category: impl Into<String>,
    priority: TodoPriority,
) -> Result<TodoItem, FamilyOpError> {
    let family = family_mut(families, family_id)?;
    let item = TodoItem::new(title, category, priority);
    family.todo_items.push(item.clone());
    family.touch_last_updated();
    Ok(item)
}

/// Set a todo item's completion state. Completing stamps `completed_at`,
/// un-completing clears it.
pub fn set_todo_completed(
    families: &mut RecordStore<Family>,
    family_id: &str,
    todo_id: &str,
    completed: bool,
) -> Result<(), FamilyOpError> {
    let family = family_mut(families, family_id)?;
    let item = family
        .todo_mut(todo_id)
        .ok_or_else(|| FamilyOpError::TodoNotFound(todo_id.to_string()))?;
    item.completed = completed;
    item.completed_at = if completed { Some(Utc::now()) } else { None };
    family.touch_last_updated();
    Ok(())
}

/// Flip a todo item's completion state, returning the new state.
pub fn toggle_todo(
    families: &mut RecordStore<Family>,
    family_id: &str,
    todo_id: &str,
) -> Result<bool, FamilyOpError> {
    let family = family_mut(families, family_id)?;
    let item = family
        .todo(todo_id)
        .ok_or_else(|| FamilyOpError::TodoNotFound(todo_id.to_string()))?;
    let next = !item.completed;
    set_todo_completed(families, family_id, todo_id, next)?;
    Ok(next)
}

/// Remove a todo item, returning it.
pub fn remove_todo(
    families: &mut RecordStore<Family>,
    family_id: &str,
    todo_id: &str,
) -> Result<TodoItem, FamilyOpError> {
    let family = family_mut(families, family_id)?;
    let index = family
        .todo_items
        .iter()
        .position(|item| item.id == todo_id)
        .ok_or_else(|| FamilyOpError::TodoNotFound(todo_id.to_string()))?;
    let removed = family.todo_items.remove(index);
    family.touch_last_updated();
    Ok(removed)
}

pub fn set_review_day(
    families: &mut RecordStore<Family>,
    family_id: &str,
    review_day: ReviewDay,
) -> Result<(), FamilyOpError> {
    let family = family_mut(families, family_id)?;
    family.review_day = review_day;
    family.touch_last_updated();
    Ok(())
}

pub fn set_notes(
    families: &mut RecordStore<Family>,
    family_id: &str,
    notes: Option<String>,
) -> Result<(), FamilyOpError> {
    let family = family_mut(families, family_id)?;
    family.notes = notes.filter(|n| !n.trim().is_empty());
    family.touch_last_updated();
    Ok(())
}

/// Todo items across all families, grouped by category. Categories sort
/// alphabetically; items by priority (high first) then title.
pub fn todos_by_category(families: &RecordStore<Family>) -> Vec<CategoryTodos> {
    let mut by_category: BTreeMap<String, Vec<TodoView>> = BTreeMap::new();
    for family in families.records() {
        for item in &family.todo_items {
            by_category
                .entry(item.category.clone())
                .or_default()
                .push(TodoView {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    priority: item.priority,
                    completed: item.completed,
                    family_name: family.head_of_household.clone(),
                    family_id: family.id.clone(),
                });
        }
    }

    by_category
        .into_iter()
        .map(|(category, mut items)| {
            items.sort_by(|a, b| {
                b.priority
                    .rank()
                    .cmp(&a.priority.rank())
                    .then_with(|| a.title.cmp(&b.title))
            });
            CategoryTodos { category, items }
        })
        .collect()
}

fn family_mut<'a>(
    families: &'a mut RecordStore<Family>,
    family_id: &str,
) -> Result<&'a mut Family, FamilyOpError> {
    families
        .get_mut(family_id)
        .ok_or_else(|| FamilyOpError::FamilyNotFound(family_id.to_string()))
}
