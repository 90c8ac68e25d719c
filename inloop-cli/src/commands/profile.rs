//! Profile command - show or edit the signed-in profile

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use inloop_core::ProfileUpdate;

use super::{fail, get_context, print_json_ok};
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the signed-in profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit profile fields; role and email cannot be changed
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        department: Option<String>,
        /// Year of study
        #[arg(long)]
        year: Option<u32>,
        /// Avatar image URL or path
        #[arg(long)]
        avatar: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show { json } => {
            let ctx = get_context()?;
            let account = ctx.session.require_current().map_err(|e| fail(e, json))?;

            if json {
                return print_json_ok(account);
            }

            println!("{}", account.username.bold());
            println!("{}", output::account_table(&account));
        }
        ProfileCommands::Update {
            username,
            bio,
            department,
            year,
            avatar,
            json,
        } => {
            let update = ProfileUpdate {
                username,
                bio,
                department,
                year,
                avatar,
            };
            if update.is_empty() {
                anyhow::bail!(
                    "Nothing to update; pass at least one of --username, --bio, --department, --year, --avatar"
                );
            }

            let ctx = get_context()?;
            let updated = match ctx.session.update_profile(&update) {
                Ok(Some(account)) => account,
                Ok(None) => return Err(fail(inloop_core::Error::NoActiveSession, json)),
                Err(e) => return Err(fail(e, json)),
            };

            if json {
                return print_json_ok(updated);
            }

            output::success("Profile updated");
            println!("{}", output::account_table(&updated));
        }
    }

    Ok(())
}
