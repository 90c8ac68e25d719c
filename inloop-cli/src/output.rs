//! Output formatting utilities

use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use inloop_core::{Account, Role, RoleCapabilities};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Spinner shown while a sign-in or sign-up is pending.
///
/// Hidden when stdout is not a terminal or JSON output was requested.
pub fn spinner(msg: &str, json: bool) -> ProgressBar {
    if json || atty::isnt(atty::Stream::Stdout) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn role_label(role: Role) -> String {
    match role {
        Role::Administrator => role.label().red().to_string(),
        Role::Organization => role.label().magenta().to_string(),
        Role::Member => role.label().blue().to_string(),
    }
}

/// Comma-separated list of what a role may do
pub fn capability_list(caps: &RoleCapabilities) -> String {
    let mut allowed = Vec::new();
    if caps.can_create_post {
        allowed.push("post");
    }
    if caps.can_comment {
        allowed.push("comment");
    }
    if caps.can_react {
        allowed.push("react");
    }
    if caps.can_ask_question {
        allowed.push("ask");
    }
    allowed.join(", ")
}

/// Vertical key-value table for one account
pub fn account_table(account: &Account) -> Table {
    let mut table = create_table();
    table.add_row(vec!["Username".to_string(), account.username.clone()]);
    table.add_row(vec!["Email".to_string(), account.email.clone()]);
    table.add_row(vec!["Role".to_string(), role_label(account.role)]);
    table.add_row(vec!["ID".to_string(), account.id.clone()]);
    table.add_row(vec![
        "Avatar".to_string(),
        account.avatar_or_placeholder().to_string(),
    ]);
    if let Some(department) = &account.department {
        table.add_row(vec!["Department".to_string(), department.clone()]);
    }
    if let Some(year) = account.year {
        table.add_row(vec!["Year".to_string(), year.to_string()]);
    }
    if let Some(bio) = &account.bio {
        table.add_row(vec!["Bio".to_string(), bio.clone()]);
    }
    table.add_row(vec![
        "Can".to_string(),
        capability_list(&account.role.capabilities()),
    ]);
    table
}
