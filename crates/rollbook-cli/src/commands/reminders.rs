use crate::cli::ReminderCommands;
use crate::support::{
    data_dir_or_exit, load_collection_or_exit, month_arg_or_exit, mutate_collection_or_exit,
    parse_date_or_exit,
};
use chrono::Local;
use rollbook_records::{CompletionRecord, Member, RecordStore};
use rollbook_reminders::{
    build_reminder_drafts, mark_anniversary_done, mark_birthday_done, unmark_anniversary_done,
    unmark_birthday_done,
};
use serde_json::json;

pub fn run(command: ReminderCommands) {
    match command {
        ReminderCommands::Today { date, path, json } => run_today(date, path, json),

        ReminderCommands::Complete {
            kind,
            id,
            month,
            undo,
            path,
            json,
        } => run_complete(kind, id, month, undo, path, json),

        ReminderCommands::Completions { month, path, json } => run_completions(month, path, json),
    }
}

fn run_today(date: Option<String>, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let on = match date {
        Some(raw) => parse_date_or_exit(&raw),
        None => Local::now().date_naive(),
    };

    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let drafts = build_reminder_drafts(&store, on);

    if json_output {
        let items = drafts
            .iter()
            .map(|draft| {
                json!({
                    "id": draft.id,
                    "kind": draft.kind,
                    "title": draft.title,
                    "body": draft.body,
                    "message": draft.message,
                    "phone": draft.phone,
                    "smsLink": draft.sms_link(),
                    "sendAt": draft.send_at.to_string()
                })
            })
            .collect::<Vec<_>>();
        let payload = json!({
            "action": "reminders.today",
            "date": on.to_string(),
            "count": items.len(),
            "items": items
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook reminders today {on}\n  Count: {}",
            drafts.len()
        );
        for draft in drafts {
            println!(
                "  - #{} {} {} -> {}",
                draft.id,
                draft.kind.as_str(),
                draft.body,
                draft.phone
            );
            println!("    {}", draft.sms_link());
        }
    }
}

fn run_complete(
    kind: String,
    id: String,
    month: Option<String>,
    undo: bool,
    path: String,
    json_output: bool,
) {
    let data_dir = data_dir_or_exit(&path);
    let month = month_arg_or_exit(month);

    let changed = mutate_collection_or_exit(
        &data_dir.completions_file(),
        |store: &mut RecordStore<CompletionRecord>| {
            let changed = match (kind.as_str(), undo) {
                ("birthday", false) => mark_birthday_done(store, &month, &id),
                ("birthday", true) => unmark_birthday_done(store, &month, &id),
                ("anniversary", false) => mark_anniversary_done(store, &month, &id),
                ("anniversary", true) => unmark_anniversary_done(store, &month, &id),
                _ => {
                    return Err(format!(
                        "invalid reminder kind: {kind} (use birthday or anniversary)"
                    ));
                }
            };
            Ok((changed, changed))
        },
    );

    if json_output {
        let payload = json!({
            "action": "reminders.complete",
            "kind": kind,
            "id": id,
            "month": month,
            "undo": undo,
            "changed": changed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        let verb = if undo { "Unmarked" } else { "Marked" };
        let note = if changed { "" } else { " (no change)" };
        println!("rollbook reminders complete\n  {verb}: {kind} {id} for {month}{note}");
    }
}

fn run_completions(month: Option<String>, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<CompletionRecord>(&data_dir.completions_file());

    let records: Vec<&CompletionRecord> = match &month {
        Some(key) => store.get(key).into_iter().collect(),
        None => store.records().collect(),
    };

    if json_output {
        let payload = json!({
            "action": "reminders.completions",
            "month": month,
            "count": records.len(),
            "items": records
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook reminders completions\n  Months: {}", records.len());
        for record in records {
            println!("  {}:", record.month);
            for id in &record.birthdays {
                println!("    - birthday {id}");
            }
            for household in &record.anniversaries {
                println!("    - anniversary {household}");
            }
        }
    }
}
