//! Login command - sign in with email and password

use anyhow::Result;

use super::{fail, get_context, get_password_or_prompt, print_json_ok};
use crate::output;

pub async fn run(email: &str, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let password = get_password_or_prompt(password, "Password")?;

    let pb = output::spinner("Signing in...", json);
    let result = ctx.session.authenticate(email.trim(), &password).await;
    pb.finish_and_clear();

    let account = result.map_err(|e| fail(e, json))?;

    if json {
        return print_json_ok(account);
    }

    output::success(&format!(
        "Signed in as {} ({})",
        account.username,
        output::role_label(account.role)
    ));
    Ok(())
}
