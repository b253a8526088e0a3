use crate::support::yes_no;
use rollbook_records::{
    AppConfig, CompletionRecord, DataDir, Family, Member, PlotLocation, Record, RecordStore,
    save_config,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub created_root: bool,
    pub created_data_dir: bool,
    pub created_members: bool,
    pub created_families: bool,
    pub created_completions: bool,
    pub created_plots: bool,
    pub created_config: bool,
}

pub fn init_layout(path: impl AsRef<Path>) -> Result<InitOutcome, String> {
    let root = path.as_ref().to_path_buf();

    let mut created_root = false;
    if !root.exists() {
        fs::create_dir_all(&root)
            .map_err(|e| format!("failed to create init path {}: {e}", root.display()))?;
        created_root = true;
    }
    if !root.is_dir() {
        return Err(format!("init path is not a directory: {}", root.display()));
    }

    let data_dir = DataDir::under(&root);
    let mut created_data_dir = false;
    if !data_dir.root().exists() {
        fs::create_dir_all(data_dir.root()).map_err(|e| {
            format!(
                "failed to create data directory {}: {e}",
                data_dir.root().display()
            )
        })?;
        created_data_dir = true;
    }
    if !data_dir.root().is_dir() {
        return Err(format!(
            "data path is not a directory: {}",
            data_dir.root().display()
        ));
    }

    let created_members = init_collection::<Member>(&data_dir.members_file())?;
    let created_families = init_collection::<Family>(&data_dir.families_file())?;
    let created_completions = init_collection::<CompletionRecord>(&data_dir.completions_file())?;
    let created_plots = init_collection::<PlotLocation>(&data_dir.plots_file())?;

    let config_path = data_dir.config_file();
    let mut created_config = false;
    if config_path.exists() {
        if !config_path.is_file() {
            return Err(format!(
                "config path exists but is not a file: {}",
                config_path.display()
            ));
        }
    } else {
        save_config(&config_path, &AppConfig::default())
            .map_err(|e| format!("failed to initialize {}: {e}", config_path.display()))?;
        created_config = true;
    }

    Ok(InitOutcome {
        root,
        data_dir: data_dir.root().to_path_buf(),
        created_root,
        created_data_dir,
        created_members,
        created_families,
        created_completions,
        created_plots,
        created_config,
    })
}

fn init_collection<T>(path: &Path) -> Result<bool, String>
where
    T: Record + Serialize + DeserializeOwned,
{
    if path.exists() {
        if !path.is_file() {
            return Err(format!(
                "collection path exists but is not a file: {}",
                path.display()
            ));
        }
        return Ok(false);
    }
    RecordStore::<T>::default()
        .save_jsonl(path)
        .map_err(|e| format!("failed to initialize {}: {e}", path.display()))?;
    Ok(true)
}

pub fn run(path: String, json_output: bool) {
    let outcome = init_layout(&path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "action": "init",
            "root": outcome.root.display().to_string(),
            "dataDir": outcome.data_dir.display().to_string(),
            "createdRoot": outcome.created_root,
            "createdDataDir": outcome.created_data_dir,
            "createdMembers": outcome.created_members,
            "createdFamilies": outcome.created_families,
            "createdCompletions": outcome.created_completions,
            "createdPlots": outcome.created_plots,
            "createdConfig": outcome.created_config
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("rollbook init {path}");
        println!();
        println!("  root: {}", outcome.root.display());
        println!("  data dir: {}", outcome.data_dir.display());
        println!("  created data dir: {}", yes_no(outcome.created_data_dir));
        println!("  created members.jsonl: {}", yes_no(outcome.created_members));
        println!(
            "  created families.jsonl: {}",
            yes_no(outcome.created_families)
        );
        println!(
            "  created completions.jsonl: {}",
            yes_no(outcome.created_completions)
        );
        println!("  created plots.jsonl: {}", yes_no(outcome.created_plots));
        println!("  created config.toml: {}", yes_no(outcome.created_config));
    }
}
