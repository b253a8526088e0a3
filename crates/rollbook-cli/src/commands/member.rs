use crate::cli::MemberCommands;
use crate::support::{data_dir_or_exit, load_collection_or_exit, mutate_collection_or_exit};
use chrono::Utc;
use rollbook_directory::DirectoryIndex;
use rollbook_records::{Gender, Member, RecordStore, next_member_id};
use serde_json::json;

pub fn run(command: MemberCommands) {
    match command {
        MemberCommands::Add {
            preferred_name,
            head_of_house,
            address,
            phone,
            email,
            age,
            gender,
            birth_date,
            marriage_date,
            path,
            json,
        } => run_add(AddArgs {
            preferred_name,
            head_of_house,
            address,
            phone,
            email,
            age,
            gender,
            birth_date,
            marriage_date,
            path,
            json,
        }),

        MemberCommands::List { path, json } => run_list(path, json),

        MemberCommands::Show { id, path, json } => run_show(id, path, json),

        MemberCommands::Update {
            id,
            preferred_name,
            head_of_house,
            address,
            phone,
            email,
            age,
            gender,
            birth_date,
            marriage_date,
            path,
            json,
        } => run_update(UpdateArgs {
            id,
            preferred_name,
            head_of_house,
            address,
            phone,
            email,
            age,
            gender,
            birth_date,
            marriage_date,
            path,
            json,
        }),

        MemberCommands::Remove { id, path, json } => run_remove(id, path, json),

        MemberCommands::Search { term, path, json } => run_search(term, path, json),
    }
}

pub struct AddArgs {
    pub preferred_name: String,
    pub head_of_house: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub age: u8,
    pub gender: String,
    pub birth_date: Option<String>,
    pub marriage_date: Option<String>,
    pub path: String,
    pub json: bool,
}

fn run_add(args: AddArgs) {
    let data_dir = data_dir_or_exit(&args.path);
    let gender = parse_gender_or_exit(&args.gender);

    let head_of_house = args
        .head_of_house
        .unwrap_or_else(|| args.preferred_name.clone());

    let added = mutate_collection_or_exit(
        &data_dir.members_file(),
        |store: &mut RecordStore<Member>| {
            let id = next_member_id(store);
            let mut member = Member::new(id, args.preferred_name.clone(), head_of_house.clone());
            member.address_street_1 = args.address.clone().unwrap_or_default();
            member.individual_phone = args.phone.clone();
            member.individual_email = args.email.clone();
            member.age = args.age;
            member.gender = gender;
            member.birth_date = args.birth_date.clone();
            member.marriage_date = args.marriage_date.clone();
            store.upsert(member.clone());
            Ok((member, true))
        },
    );

    if args.json {
        let payload = json!({
            "action": "member.add",
            "member": added
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook member add\n  Added: {} [{}]\n  Household: {}",
            added.id, added.preferred_name, added.head_of_house
        );
    }
}

fn run_list(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let index = DirectoryIndex::hydrate(&store);
    let rows = index.search("");

    if json_output {
        let payload = json!({
            "action": "member.list",
            "count": rows.len(),
            "items": rows
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook member list\n  Count: {}", rows.len());
        for member in rows {
            println!(
                "  - {} {} [{}] age {}",
                member.id, member.preferred_name, member.head_of_house, member.age
            );
        }
    }
}

fn run_show(id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let member = store.get(&id).unwrap_or_else(|| {
        eprintln!("error: member not found: {id}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "action": "member.show",
            "member": member
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook member show {id}");
        println!("  name: {}", member.preferred_name);
        println!("  household: {}", member.head_of_house);
        println!("  age: {}  gender: {}", member.age, member.gender);
        if !member.address_street_1.is_empty() {
            println!("  address: {}", member.address_street_1);
        }
        if let Some(phone) = &member.individual_phone {
            println!("  phone: {phone}");
        }
        if let Some(email) = &member.individual_email {
            println!("  email: {email}");
        }
        if let Some(birth_date) = &member.birth_date {
            println!("  birth date: {birth_date}");
        }
        if let Some(marriage_date) = &member.marriage_date {
            println!("  marriage date: {marriage_date}");
        }
        if !member.callings.is_empty() {
            println!("  callings: {}", member.callings.join("; "));
        }
        if let Some(office) = &member.priesthood_office {
            println!("  priesthood office: {office}");
        }
    }
}

pub struct UpdateArgs {
    pub id: String,
    pub preferred_name: Option<String>,
    pub head_of_house: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub marriage_date: Option<String>,
    pub path: String,
    pub json: bool,
}

fn run_update(args: UpdateArgs) {
    let data_dir = data_dir_or_exit(&args.path);
    let gender = args.gender.as_deref().map(parse_gender_or_exit);
    let id = args.id.clone();

    let updated = mutate_collection_or_exit(
        &data_dir.members_file(),
        |store: &mut RecordStore<Member>| {
            let member = store
                .get_mut(&id)
                .ok_or_else(|| format!("member not found: {id}"))?;

            let mut changed = false;
            if let Some(next) = args.preferred_name {
                member.preferred_name = next;
                changed = true;
            }
            if let Some(next) = args.head_of_house {
                member.head_of_house = next;
                changed = true;
            }
            if let Some(next) = args.address {
                member.address_street_1 = next;
                changed = true;
            }
            if let Some(next) = args.phone {
                member.individual_phone = Some(next);
                changed = true;
            }
            if let Some(next) = args.email {
                member.individual_email = Some(next);
                changed = true;
            }
            if let Some(next) = args.age {
                member.age = next;
                changed = true;
            }
            if let Some(next) = gender {
                member.gender = next;
                changed = true;
            }
            if let Some(next) = args.birth_date {
                member.birth_date = Some(next);
                changed = true;
            }
            if let Some(next) = args.marriage_date {
                member.marriage_date = Some(next);
                changed = true;
            }
            if changed {
                member.updated_at = Utc::now();
            }
            Ok((member.clone(), changed))
        },
    );

    if args.json {
        let payload = json!({
            "action": "member.update",
            "member": updated
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook member update\n  Updated: {} [{}]",
            updated.id, updated.preferred_name
        );
    }
}

fn run_remove(id: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let removed = mutate_collection_or_exit(
        &data_dir.members_file(),
        |store: &mut RecordStore<Member>| {
            let member = store
                .remove(&id)
                .map_err(|_| format!("member not found: {id}"))?;
            Ok((member, true))
        },
    );

    if json_output {
        let payload = json!({
            "action": "member.remove",
            "member": removed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook member remove\n  Removed: {} [{}]",
            removed.id, removed.preferred_name
        );
    }
}

fn run_search(term: String, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let store = load_collection_or_exit::<Member>(&data_dir.members_file());
    let index = DirectoryIndex::hydrate(&store);
    let rows = index.search(&term);

    if json_output {
        let payload = json!({
            "action": "member.search",
            "term": term,
            "count": rows.len(),
            "items": rows
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "rollbook member search {term:?}\n  Count: {}",
            rows.len()
        );
        for member in rows {
            println!(
                "  - {} {} [{}]",
                member.id, member.preferred_name, member.head_of_house
            );
        }
    }
}

fn parse_gender_or_exit(raw: &str) -> Gender {
    Gender::parse(raw.trim()).unwrap_or_else(|| {
        eprintln!("error: invalid gender: {raw} (use M or F)");
        std::process::exit(1);
    })
}
