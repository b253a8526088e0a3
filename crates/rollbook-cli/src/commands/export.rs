use crate::cli::ExportCommands;
use crate::support::{data_dir_or_exit, load_collection_or_exit};
use rollbook_import::export_tsv;
use rollbook_records::Member;
use std::fs;

pub fn run(command: ExportCommands) {
    match command {
        ExportCommands::Tsv { out, path } => run_tsv(out, path),
    }
}

fn run_tsv(out: Option<String>, path: String) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let text = export_tsv(store.records());

    match out {
        Some(out_path) => {
            fs::write(&out_path, &text).unwrap_or_else(|e| {
                eprintln!("error: failed to write {out_path}: {e}");
                std::process::exit(1);
            });
            println!(
                "rollbook export tsv\n  Members: {}\n  Out: {out_path}",
                store.len()
            );
        }
        // Raw TSV on stdout so the output pipes and pastes cleanly.
        None => print!("{text}"),
    }
}
