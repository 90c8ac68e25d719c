//! Status command - show session and storage summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use inloop_core::SessionState;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Inloop Status".bold());
    println!();

    let session = match (&status.session_state, &status.signed_in) {
        (SessionState::LoggedIn, Some(user)) => format!("{} <{}> ({})", user.username, user.email, user.role),
        (SessionState::Unresolved, _) => "loading".to_string(),
        _ => "signed out".to_string(),
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Session".to_string(), session]);
    table.add_row(vec!["Storage".to_string(), status.storage_backend.clone()]);
    table.add_row(vec!["Accounts".to_string(), status.total_accounts.to_string()]);
    table.add_row(vec!["  Built-in".to_string(), status.builtin_accounts.to_string()]);
    table.add_row(vec!["  Registered".to_string(), status.registered_accounts.to_string()]);
    table.add_row(vec!["Sign-in delay".to_string(), format!("{} ms", status.latency_ms)]);

    println!("{}", table);
    println!();

    if !status.accounts_by_role.is_empty() {
        println!("{}", "Accounts by Role".bold());
        for (role, count) in &status.accounts_by_role {
            println!("  • {}: {}", role, count);
        }
    }

    if let Some(user) = &status.signed_in {
        println!();
        println!("{} {}", "You can:".bold(), output::capability_list(&user.capabilities));
    }

    Ok(())
}
