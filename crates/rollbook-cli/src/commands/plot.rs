use crate::cli::PlotCommands;
use crate::support::{data_dir_or_exit, load_collection_or_exit, mutate_collection_or_exit};
use rollbook_directory::{families_with_members, plots_with_families};
use rollbook_records::{DataDir, Family, Member, PlotLocation, RecordStore};
use serde_json::json;

pub fn run(command: PlotCommands) {
    match command {
        PlotCommands::Add {
            address,
            x,
            y,
            notes,
            path,
            json,
        } => run_add(address, x, y, notes, path, json),

        PlotCommands::List { path, json } => run_list(path, json),

        PlotCommands::SetFamily {
            id,
            family,
            path,
            json,
        } => run_set_family(id, family, path, json),

        PlotCommands::Move { id, x, y, path, json } => run_move(id, x, y, path, json),

        PlotCommands::Remove { id, path, json } => run_remove(id, path, json),
    }
}

fn run_add(
    address: String,
    x: f64,
    y: f64,
    notes: Option<String>,
    path: String,
    json_output: bool,
) {
    let data_dir = data_dir_or_exit(&path);

    let added = mutate_collection_or_exit(
        &data_dir.plots_file(),
        |store: &mut RecordStore<PlotLocation>| {
            let mut plot = PlotLocation::new(address.clone(), x, y);
            plot.notes = notes.clone();
            store.upsert(plot.clone());
            Ok((plot, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "plot.add",
            "plot": added
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook plot add\n  Added: {} at ({}, {})\n  Address: {}",
            added.id, added.x, added.y, added.address
        );
    }
}

fn run_list(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let plots_store = load_collection_or_exit::<PlotLocation>(&data_dir.plots_file());
    let plots: Vec<PlotLocation> = plots_store.records().cloned().collect();

    // Join against the family views so assigned plots show who lives there.
    let members = load_collection_or_exit::<Member>(&data_dir.members_file());
    let mut families = load_collection_or_exit::<Family>(&data_dir.families_file());
    let (views, _) = families_with_members(&mut families, &members);
    let joined = plots_with_families(&plots, &views);

    if json_output {
        let payload = json!({
            "action": "plot.list",
            "count": joined.len(),
            "items": joined
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook plot list\n  Count: {}", joined.len());
        for entry in joined {
            let family = entry
                .family
                .as_ref()
                .map(|f| f.name.as_str())
                .unwrap_or("(unassigned)");
            println!(
                "  - {} ({}, {}) {} -> {family}",
                entry.plot.id, entry.plot.x, entry.plot.y, entry.plot.address
            );
        }
    }
}

fn run_set_family(id: String, family: Option<String>, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    if let Some(family_id) = &family {
        require_family_exists(&data_dir, family_id);
    }

    mutate_collection_or_exit(
        &data_dir.plots_file(),
        |store: &mut RecordStore<PlotLocation>| {
            let plot = store
                .get_mut(&id)
                .ok_or_else(|| format!("plot not found: {id}"))?;
            plot.family_id = family.clone();
            Ok(((), true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "plot.set_family",
            "plotId": id,
            "familyId": family
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        match family {
            Some(family_id) => {
                println!("rollbook plot set-family\n  Plot: {id}\n  Family: {family_id}");
            }
            None => println!("rollbook plot set-family\n  Plot: {id}\n  Assignment cleared"),
        }
    }
}

fn run_move(id: String, x: f64, y: f64, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);

    mutate_collection_or_exit(
        &data_dir.plots_file(),
        |store: &mut RecordStore<PlotLocation>| {
            let plot = store
                .get_mut(&id)
                .ok_or_else(|| format!("plot not found: {id}"))?;
            plot.set_position(x, y);
            Ok(((), true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "plot.move",
            "plotId": id,
            "x": x,
            "y": y
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook plot move\n  Plot: {id}\n  Position: ({x}, {y})");
    }
}

fn run_remove(id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);

    let removed = mutate_collection_or_exit(
        &data_dir.plots_file(),
        |store: &mut RecordStore<PlotLocation>| {
            let plot = store
                .remove(&id)
                .map_err(|_| format!("plot not found: {id}"))?;
            Ok((plot, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "plot.remove",
            "plot": removed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook plot remove\n  Removed: {} {}",
            removed.id, removed.address
        );
    }
}

fn require_family_exists(data_dir: &DataDir, family_id: &str) {
    let families = load_collection_or_exit::<Family>(&data_dir.families_file());
    if families.get(family_id).is_none() {
        eprintln!("error: family not found: {family_id}");
        std::process::exit(1);
    }
}
