//! Derived views over roster state.
//!
//! This crate is the query side of the roll book: household groupings, age
//! bands, search, family work-list operations and the plot/family join.
//! Everything hydrates from `rollbook-records` stores; nothing here owns
//! canonical storage, and the only writes are the family self-heal and the
//! explicit family operations, which hand changed stores back to the
//! caller to persist.

mod families;
mod index;
mod plots;

pub use families::{
    CategoryTodos, FamilyMemberDetail, FamilyOpError, FamilyWithMembers, RepairOutcome, TodoView,
    add_todo, families_with_members, init_families, remove_todo, repair_families, set_notes,
    set_review_day, set_todo_completed, todos_by_category, toggle_todo,
};
pub use index::{AgeGroups, DirectoryIndex, Household};
pub use plots::{PlotFamily, PlotFamilyMember, PlotWithFamily, plots_with_families};
