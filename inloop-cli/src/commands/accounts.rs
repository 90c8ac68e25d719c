//! Accounts command - list built-in and registered accounts

use anyhow::Result;
use colored::Colorize;
use inloop_core::Role;
use serde::Serialize;

use super::{get_context, print_json_ok};
use crate::output;

#[derive(Serialize)]
struct AccountRow {
    id: String,
    username: String,
    email: String,
    role: Role,
    builtin: bool,
    current: bool,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let registry = ctx.session.registry();
    let current_email = ctx.session.current()?.map(|a| a.email);

    let rows: Vec<AccountRow> = registry
        .list()?
        .into_iter()
        .map(|a| AccountRow {
            builtin: registry.is_seed(&a.email),
            current: current_email.as_deref() == Some(a.email.as_str()),
            id: a.id,
            username: a.username,
            email: a.email,
            role: a.role,
        })
        .collect();

    if json {
        return print_json_ok(rows);
    }

    let mut table = output::create_table();
    table.set_header(vec!["", "Username", "Email", "Role", "Source"]);
    for row in &rows {
        table.add_row(vec![
            if row.current { "*".green().to_string() } else { String::new() },
            row.username.clone(),
            row.email.clone(),
            output::role_label(row.role),
            if row.builtin { "built-in".dimmed().to_string() } else { "registered".to_string() },
        ]);
    }

    println!("{}", table);
    println!("{} accounts", rows.len());
    Ok(())
}
