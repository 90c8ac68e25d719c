//! CLI command implementations

pub mod accounts;
pub mod config;
pub mod login;
pub mod logout;
pub mod logs;
pub mod profile;
pub mod signup;
pub mod status;
pub mod whoami;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::Password;
use serde::Serialize;

use inloop_core::{EntryPoint, Error, InloopContext, LogEvent, LoggingService, OperationResult};

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: Option<&LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!("failed to write event log: {}", e);
        }
    }
}

/// Get the inloop directory from INLOOP_DIR or default to ~/.inloop
pub fn get_inloop_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("INLOOP_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory; set INLOOP_DIR")?;
    Ok(home.join(".inloop"))
}

/// Open the data directory and rehydrate the session
pub fn get_context() -> Result<InloopContext> {
    let inloop_dir = get_inloop_dir()?;

    std::fs::create_dir_all(&inloop_dir)
        .with_context(|| format!("Failed to create inloop directory: {:?}", inloop_dir))?;

    InloopContext::new(&inloop_dir, EntryPoint::Cli).context("Failed to initialize inloop context")
}

/// Get a password from the --password flag, INLOOP_PASSWORD, or a prompt
pub fn get_password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("INLOOP_PASSWORD") {
        return Ok(p);
    }

    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("No password given; pass --password or set INLOOP_PASSWORD");
    }

    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

/// Like [`get_password_or_prompt`], but an interactive prompt asks twice
pub fn get_new_password(password_flag: Option<String>) -> Result<String> {
    if password_flag.is_some() || env::var("INLOOP_PASSWORD").is_ok() {
        return get_password_or_prompt(password_flag, "Password");
    }

    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("No password given; pass --password or set INLOOP_PASSWORD");
    }

    let p = Password::new()
        .with_prompt("Choose a password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(p)
}

/// Print a successful result as the `{ success, data }` envelope
pub fn print_json_ok<T: Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
    Ok(())
}

/// Report a failed operation and turn it into the command's error.
///
/// In JSON mode the `{ success: false, error }` envelope goes to stdout
/// before the error propagates.
pub fn fail(err: Error, json: bool) -> anyhow::Error {
    if json {
        let envelope = OperationResult::<()>::fail(err.to_string());
        if let Ok(text) = serde_json::to_string_pretty(&envelope) {
            println!("{}", text);
        }
    }
    if err.is_rejection() {
        anyhow::Error::new(err)
    } else {
        anyhow::Error::new(err).context("Unexpected failure")
    }
}
