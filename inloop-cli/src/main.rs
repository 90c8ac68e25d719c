//! Inloop CLI - your campus network identity in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, config, login, logout, logs, profile, signup, status, whoami};

/// Inloop - sign in, sign up and manage your campus profile
#[derive(Parser)]
#[command(name = "inloop", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email (any casing)
        email: String,
        /// Password (falls back to INLOOP_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and sign it in
    Signup {
        /// Display name
        #[arg(long)]
        username: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Role: student, club or admin
        #[arg(long, default_value = "student")]
        role: String,
        /// Password (falls back to INLOOP_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out of the current session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is signed in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit the signed-in profile
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },

    /// List known accounts
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show session and storage status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

/// Diagnostics go to stderr; INLOOP_LOG takes an EnvFilter directive
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("INLOOP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output::error(&format!("Failed to start runtime: {}", e));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password, json } => login::run(&email, password, json).await,
        Commands::Signup { username, email, role, password, json } => {
            signup::run(&username, &email, &role, password, json).await
        }
        Commands::Logout { json } => logout::run(json),
        Commands::Whoami { json } => whoami::run(json),
        Commands::Profile { command } => profile::run(command),
        Commands::Accounts { json } => accounts::run(json),
        Commands::Status { json } => status::run(json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
