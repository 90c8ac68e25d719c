//! Config command - show or change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use inloop_core::config::Config;

use super::{get_inloop_dir, print_json_ok};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings (environment overrides applied)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting: storage, latencyMs or passwordHashing
    Set {
        key: String,
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let inloop_dir = get_inloop_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&inloop_dir)?;

            if json {
                return print_json_ok(config);
            }

            println!("{}", "Settings".bold());
            let mut table = output::create_table();
            table.add_row(vec!["storage".to_string(), config.storage.to_string()]);
            table.add_row(vec!["latencyMs".to_string(), config.latency_ms.to_string()]);
            table.add_row(vec![
                "passwordHashing".to_string(),
                config.password_hashing.to_string(),
            ]);
            println!("{}", table);
            println!("{}", inloop_dir.join("settings.json").display().to_string().dimmed());
        }
        ConfigCommands::Set { key, value } => {
            std::fs::create_dir_all(&inloop_dir)?;
            let mut config = Config::load_saved(&inloop_dir)?;
            config.set_value(&key, &value)?;
            config.save(&inloop_dir)?;
            output::success(&format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}
