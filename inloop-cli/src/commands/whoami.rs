//! Whoami command - show the current session

use anyhow::Result;
use colored::Colorize;

use super::{get_context, print_json_ok};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let snapshot = ctx.session.snapshot()?;

    if json {
        return print_json_ok(snapshot);
    }

    match &snapshot.account {
        Some(account) => {
            println!("{}", account.username.bold());
            println!("{}", output::account_table(account));
        }
        None => {
            if snapshot.should_redirect_to_login() {
                output::warning("Not signed in. Run `inloop login <email>` or `inloop signup`.");
            }
        }
    }
    Ok(())
}
