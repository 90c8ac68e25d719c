//! Signup command - create an account and sign it in

use anyhow::Result;
use inloop_core::{LogEvent, Role};

use super::{fail, get_context, get_new_password, log_event, print_json_ok};
use crate::output;

pub async fn run(
    username: &str,
    email: &str,
    role: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let role: Role = role.parse()?;
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }

    let ctx = get_context()?;
    let password = get_new_password(password)?;
    if password.is_empty() {
        log_event(
            ctx.logger.as_deref(),
            LogEvent::new("signup_rejected")
                .with_role(role)
                .with_command("signup")
                .with_error("empty password"),
        );
        anyhow::bail!("Password cannot be empty");
    }

    let pb = output::spinner("Creating account...", json);
    let result = ctx.session.register(username, email.trim(), &password, role).await;
    pb.finish_and_clear();

    let account = result.map_err(|e| fail(e, json))?;

    if json {
        return print_json_ok(account);
    }

    output::success(&format!(
        "Welcome to Inloop, {}! Signed in as {}",
        account.username,
        output::role_label(account.role)
    ));
    Ok(())
}
