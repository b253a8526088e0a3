//! Rollbook CLI: the `rollbook` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, json } => commands::init::run(path, json),

        Commands::Import { command } => commands::import::run(command),

        Commands::Export { command } => commands::export::run(command),

        Commands::Member { command } => commands::member::run(command),

        Commands::Household { command } => commands::household::run(command),

        Commands::Family { command } => commands::family::run(command),

        Commands::Reminders { command } => commands::reminders::run(command),

        Commands::Plot { command } => commands::plot::run(command),

        Commands::Map { command } => commands::map::run(command),

        Commands::Summary { path, json } => commands::summary::run(path, json),

        Commands::Serve { addr, path } => commands::serve::run(addr, path),
    }
}
