use crate::cli::HouseholdCommands;
use crate::support::{data_dir_or_exit, load_collection_or_exit};
use rollbook_directory::DirectoryIndex;
use rollbook_records::Member;
use serde_json::json;

pub fn run(command: HouseholdCommands) {
    match command {
        HouseholdCommands::List { path, json } => run_list(path, json),
    }
}

fn run_list(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let index = DirectoryIndex::hydrate(&store);
    let households = index.households();

    if json_output {
        let payload = json!({
            "action": "household.list",
            "count": households.len(),
            "items": households
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook household list\n  Count: {}", households.len());
        for household in households {
            let address = if household.address.is_empty() {
                "(no address)"
            } else {
                household.address.as_str()
            };
            println!(
                "  - {} ({} members) {address}",
                household.head_of_house,
                household.members.len()
            );
        }
    }
}
