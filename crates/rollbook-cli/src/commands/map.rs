use crate::cli::MapCommands;
use crate::support::data_dir_or_exit;
use rollbook_records::{AppConfig, load_config, save_config};
use serde_json::json;

pub fn run(command: MapCommands) {
    match command {
        MapCommands::Show { path, json } => run_show(path, json),

        MapCommands::Set {
            image_url,
            image_alt,
            path,
            json,
        } => run_set(image_url, image_alt, path, json),
    }
}

fn run_show(path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let config = load_config_or_exit(&data_dir.config_file());

    if json_output {
        let payload = json!({
            "action": "map.show",
            "map": config.map
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook map show");
        if config.map.image_url.is_empty() {
            println!("  image: (not configured)");
        } else {
            println!("  image: {}", config.map.image_url);
        }
        if !config.map.image_alt.is_empty() {
            println!("  alt: {}", config.map.image_alt);
        }
    }
}

fn run_set(image_url: Option<String>, image_alt: Option<String>, path: String, json_output: bool) {
    let data_dir = data_dir_or_exit(&path);
    let config_path = data_dir.config_file();
    let mut config = load_config_or_exit(&config_path);

    if let Some(url) = image_url {
        config.map.image_url = url;
    }
    if let Some(alt) = image_alt {
        config.map.image_alt = alt;
    }

    save_config(&config_path, &config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "action": "map.set",
            "map": config.map
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook map set");
        println!("  image: {}", config.map.image_url);
        println!("  alt: {}", config.map.image_alt);
    }
}

fn load_config_or_exit(path: &std::path::Path) -> AppConfig {
    load_config(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}
