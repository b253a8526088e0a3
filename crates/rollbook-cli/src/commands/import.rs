use crate::cli::ImportCommands;
use crate::support::{
    SAMPLE_LIMIT, data_dir_or_exit, load_collection_or_exit, mutate_collection_or_exit,
    print_sample_block, read_input_or_exit, sample_with_truncation,
};
use chrono::{Datelike, Local, Utc};
use rollbook_import::{
    ImportError, ImportPlan, ImportSummary, apply_import, extract_report_from_rsc, normalize_rows,
    parse_report_json, parse_tsv, plan_import, summarize_rows,
};
use rollbook_records::{Member, RecordStore};
use serde_json::json;
use std::collections::BTreeMap;

pub fn run(command: ImportCommands) {
    match command {
        ImportCommands::Tsv {
            file,
            dry_run,
            path,
            json,
        } => run_import(Source::Tsv, file, dry_run, path, json),

        ImportCommands::Report {
            file,
            dry_run,
            path,
            json,
        } => run_import(Source::Report, file, dry_run, path, json),

        ImportCommands::Rsc {
            file,
            dry_run,
            path,
            json,
        } => run_import(Source::Rsc, file, dry_run, path, json),
    }
}

enum Source {
    Tsv,
    Report,
    Rsc,
}

impl Source {
    fn label(&self) -> &'static str {
        match self {
            Source::Tsv => "tsv",
            Source::Report => "report",
            Source::Rsc => "rsc",
        }
    }

    fn parse(&self, text: &str) -> Result<(Vec<BTreeMap<String, String>>, Vec<String>), ImportError> {
        match self {
            Source::Tsv => {
                let table = parse_tsv(text)?;
                Ok((table.rows, table.warnings))
            }
            Source::Report => {
                let report = parse_report_json(text)?;
                Ok((report.rows, Vec::new()))
            }
            Source::Rsc => {
                let report = extract_report_from_rsc(text)?;
                Ok((report.rows, Vec::new()))
            }
        }
    }
}

fn run_import(source: Source, file: String, dry_run: bool, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let text = read_input_or_exit(&file);

    let (raw_rows, mut warnings) = source.parse(&text).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let normalized = normalize_rows(&raw_rows);
    if normalized.dropped_header_echoes > 0 {
        warnings.push(format!(
            "dropped {} header echo row(s)",
            normalized.dropped_header_echoes
        ));
    }
    if normalized.dropped_missing_name > 0 {
        warnings.push(format!(
            "dropped {} row(s) with no preferred name",
            normalized.dropped_missing_name
        ));
    }

    let summary = summarize_rows(&normalized.rows);
    let now = Utc::now();
    let current_year = Local::now().year();

    let members_path = data_dir.members_file();
    let plan = if dry_run {
        let store = load_collection_or_exit::<Member>(&members_path);
        plan_import(&store, &normalized.rows, now, current_year)
    } else {
        mutate_collection_or_exit(&members_path, |store: &mut RecordStore<Member>| {
            let plan = apply_import(store, &normalized.rows, now, current_year);
            let changed = !plan.created.is_empty() || !plan.updated.is_empty();
            Ok((plan, changed))
        })
    };

    if json_output {
        print_json(&source, &file, dry_run, &summary, &plan, &warnings);
    } else {
        print_text(&source, &file, dry_run, &summary, &plan, warnings);
    }
}

fn print_json(
    source: &Source,
    file: &str,
    dry_run: bool,
    summary: &ImportSummary,
    plan: &ImportPlan,
    warnings: &[String],
) {
    let payload = json!({
        "action": format!("import.{}", source.label()),
        "input": file,
        "dryRun": dry_run,
        "summary": summary,
        "created": plan.created,
        "updated": plan.updated,
        "unchanged": plan.unchanged,
        "warnings": warnings,
        "errors": plan.errors
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).expect("json serialization")
    );
}

fn print_text(
    source: &Source,
    file: &str,
    dry_run: bool,
    summary: &ImportSummary,
    plan: &ImportPlan,
    warnings: Vec<String>,
) {
    println!(
        "rollbook import {} {file}\n  Mode: {}",
        source.label(),
        if dry_run { "dry-run" } else { "apply" }
    );
    println!(
        "  Rows: {}  Households: {}",
        summary.total_records, summary.households
    );
    println!(
        "  Ages: {} children, {} youth, {} adults",
        summary.children, summary.youth, summary.adults
    );
    println!(
        "  Created: {}  Updated: {}  Unchanged: {}",
        plan.created.len(),
        plan.updated.len(),
        plan.unchanged
    );

    let created: Vec<String> = plan
        .created
        .iter()
        .map(|m| format!("{} {}", m.id, m.preferred_name))
        .collect();
    let (created, created_truncated) = sample_with_truncation(created, SAMPLE_LIMIT);
    print_sample_block("created", &created, created_truncated);

    let updated: Vec<String> = plan
        .updated
        .iter()
        .map(|m| format!("{} {}", m.id, m.preferred_name))
        .collect();
    let (updated, updated_truncated) = sample_with_truncation(updated, SAMPLE_LIMIT);
    print_sample_block("updated", &updated, updated_truncated);

    let (warnings, warnings_truncated) = sample_with_truncation(warnings, SAMPLE_LIMIT);
    print_sample_block("warnings", &warnings, warnings_truncated);

    let (errors, errors_truncated) = sample_with_truncation(plan.errors.clone(), SAMPLE_LIMIT);
    print_sample_block("row errors", &errors, errors_truncated);
}
