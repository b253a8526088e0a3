use crate::cli::{FamilyCommands, FamilyTodoCommands};
use crate::support::{data_dir_or_exit, load_collection_or_exit, mutate_collection_or_exit};
use rollbook_directory::{
    FamilyWithMembers, add_todo, families_with_members, init_families, remove_todo,
    repair_families, set_notes, set_review_day, set_todo_completed, todos_by_category, toggle_todo,
};
use rollbook_records::{DataDir, Family, Member, RecordStore, ReviewDay, TodoPriority};
use serde_json::json;

pub fn run(command: FamilyCommands) {
    match command {
        FamilyCommands::Init { path, json } => run_init(path, json),

        FamilyCommands::List { path, json } => run_list(path, json),

        FamilyCommands::Show { id, path, json } => run_show(id, path, json),

        FamilyCommands::SetReviewDay {
            id,
            day,
            path,
            json,
        } => run_set_review_day(id, day, path, json),

        FamilyCommands::SetNotes {
            id,
            notes,
            path,
            json,
        } => run_set_notes(id, notes, path, json),

        FamilyCommands::Repair { path, json } => run_repair(path, json),

        FamilyCommands::Todo { command } => match command {
            FamilyTodoCommands::Add {
                family_id,
                title,
                category,
                priority,
                path,
                json,
            } => run_todo_add(family_id, title, category, priority, path, json),

            FamilyTodoCommands::Done {
                family_id,
                todo_id,
                undo,
                path,
                json,
            } => run_todo_done(family_id, todo_id, undo, path, json),

            FamilyTodoCommands::Toggle {
                family_id,
                todo_id,
                path,
                json,
            } => run_todo_toggle(family_id, todo_id, path, json),

            FamilyTodoCommands::Remove {
                family_id,
                todo_id,
                path,
                json,
            } => run_todo_remove(family_id, todo_id, path, json),

            FamilyTodoCommands::List { path, json } => run_todo_list(path, json),
        },
    }
}

fn run_init(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let members = load_collection_or_exit::<Member>(&data_dir.members_file());

    let created = mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let created = init_families(&members, store);
            let changed = !created.is_empty();
            Ok((created, changed))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.init",
            "created": created.len(),
            "familyIds": created
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook family init\n  Created: {}", created.len());
        for id in created {
            println!("  - {id}");
        }
    }
}

/// Load family views, persisting any membership heal the join performs.
fn family_views(data_dir: &DataDir) -> Vec<FamilyWithMembers> {
    let members = load_collection_or_exit::<Member>(&data_dir.members_file());
    mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let (views, changed) = families_with_members(store, &members);
            Ok((views, changed))
        },
    )
}

fn run_list(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let views = family_views(&data_dir);

    if json_output {
        let payload = json!({
            "action": "family.list",
            "count": views.len(),
            "items": views
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook family list\n  Count: {}", views.len());
        for view in views {
            let open = view.todo_items.iter().filter(|t| !t.completed).count();
            println!(
                "  - {} {} ({} members, {} open todos, reviews {})",
                view.id,
                view.head_of_household,
                view.members.len(),
                open,
                view.review_day
            );
        }
    }
}

fn run_show(id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let views = family_views(&data_dir);
    let view = views.into_iter().find(|v| v.id == id).unwrap_or_else(|| {
        eprintln!("error: family not found: {id}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "action": "family.show",
            "family": view
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook family show {id}");
        println!("  household: {}", view.head_of_household);
        println!("  review day: {}", view.review_day);
        if let Some(address) = &view.address {
            println!("  address: {address}");
        }
        if let Some(notes) = &view.notes {
            println!("  notes: {notes}");
        }
        println!("  members:");
        for member in &view.members {
            println!(
                "    - {} {} (age {})",
                member.id, member.preferred_name, member.age
            );
        }
        if !view.todo_items.is_empty() {
            println!("  todos:");
            for item in &view.todo_items {
                let mark = if item.completed { "x" } else { " " };
                println!("    [{mark}] {} {} ({})", item.id, item.title, item.priority);
            }
        }
    }
}

fn run_set_review_day(id: String, day: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let review_day = ReviewDay::parse(&day).unwrap_or_else(|| {
        eprintln!("error: invalid review day: {day} (use monday through friday)");
        std::process::exit(1);
    });

    mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            set_review_day(store, &id, review_day).map_err(|e| e.to_string())?;
            Ok(((), true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.set_review_day",
            "familyId": id,
            "reviewDay": review_day.as_str()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook family set-review-day\n  Family: {id}\n  Day: {review_day}");
    }
}

fn run_set_notes(id: String, notes: Option<String>, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let cleared = notes.as_ref().is_none_or(|n| n.trim().is_empty());

    mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            set_notes(store, &id, notes.clone()).map_err(|e| e.to_string())?;
            Ok(((), true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.set_notes",
            "familyId": id,
            "cleared": cleared
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else if cleared {
        println!("rollbook family set-notes\n  Family: {id}\n  Notes cleared");
    } else {
        println!("rollbook family set-notes\n  Family: {id}\n  Notes set");
    }
}

fn run_repair(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let members = load_collection_or_exit::<Member>(&data_dir.members_file());

    let outcome = mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let outcome = repair_families(store, &members);
            let changed = !outcome.removed.is_empty() || !outcome.created.is_empty();
            Ok((outcome, changed))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.repair",
            "removed": outcome.removed,
            "created": outcome.created
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook family repair\n  Removed: {}  Created: {}",
            outcome.removed.len(),
            outcome.created.len()
        );
        for id in &outcome.removed {
            println!("  - removed {id}");
        }
        for id in &outcome.created {
            println!("  - created {id}");
        }
    }
}

fn run_todo_add(
    family_id: String,
    title: String,
    category: String,
    priority: String,
    path: String,
    json_output: bool,
) {
    let data_dir = data_dir_or_exit(&path);
    let priority = TodoPriority::parse(&priority).unwrap_or_else(|| {
        eprintln!("error: invalid priority: {priority} (use low, medium, or high)");
        std::process::exit(1);
    });

    let item = mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let item =
                add_todo(store, &family_id, &title, &category, priority).map_err(|e| e.to_string())?;
            Ok((item, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.todo.add",
            "familyId": family_id,
            "todo": item
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook family todo add\n  Family: {family_id}\n  Added: {} {} ({})",
            item.id, item.title, item.priority
        );
    }
}

fn run_todo_done(family_id: String, todo_id: String, undo: bool, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let completed = !undo;

    mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            set_todo_completed(store, &family_id, &todo_id, completed)
                .map_err(|e| e.to_string())?;
            Ok(((), true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.todo.done",
            "familyId": family_id,
            "todoId": todo_id,
            "completed": completed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook family todo done\n  Family: {family_id}\n  Todo: {todo_id}\n  Completed: {completed}"
        );
    }
}

fn run_todo_toggle(family_id: String, todo_id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);

    let completed = mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let next = toggle_todo(store, &family_id, &todo_id).map_err(|e| e.to_string())?;
            Ok((next, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.todo.toggle",
            "familyId": family_id,
            "todoId": todo_id,
            "completed": completed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook family todo toggle\n  Family: {family_id}\n  Todo: {todo_id}\n  Completed: {completed}"
        );
    }
}

fn run_todo_remove(family_id: String, todo_id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);

    let removed = mutate_collection_or_exit(
        &data_dir.families_file(),
        |store: &mut RecordStore<Family>| {
            let item = remove_todo(store, &family_id, &todo_id).map_err(|e| e.to_string())?;
            Ok((item, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "family.todo.remove",
            "familyId": family_id,
            "todo": removed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook family todo remove\n  Family: {family_id}\n  Removed: {} {}",
            removed.id, removed.title
        );
    }
}

fn run_todo_list(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Family>(&data_dir.families_file());
    let groups = todos_by_category(&store);

    if json_output {
        let payload = json!({
            "action": "family.todo.list",
            "categories": groups
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook family todo list");
        for group in groups {
            println!("  {}:", group.category);
            for item in group.items {
                let mark = if item.completed { "x" } else { " " };
                println!(
                    "    [{mark}] {} {} ({}, {})",
                    item.id, item.title, item.priority, item.family_name
                );
            }
        }
    }
}
