use crate::support::data_dir_or_exit;
use rollbook_ux::{JsonlRosterBackend, RosterService};
use serde_json::json;

pub fn run(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let backend = JsonlRosterBackend::load(&data_dir).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let service = RosterService::new(backend);
    let summary = service.summary();

    if json_output {
        let payload = json!({
            "action": "summary",
            "summary": summary
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook summary");
        println!("  members: {}", summary.total_records);
        println!("  households: {}", summary.households);
        println!(
            "  ages: {} children, {} youth, {} adults",
            summary.children, summary.youth, summary.adults
        );
        println!("  gender: {} male, {} female", summary.male, summary.female);
    }
}
