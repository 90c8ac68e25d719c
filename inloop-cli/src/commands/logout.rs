//! Logout command - end the current session

use anyhow::Result;

use super::{fail, get_context, print_json_ok};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let was_signed_in = ctx.session.sign_out().map_err(|e| fail(e, json))?;

    if json {
        return print_json_ok(serde_json::json!({ "signed_out": was_signed_in }));
    }

    if was_signed_in {
        output::success("Signed out");
    } else {
        output::info("Not signed in");
    }
    Ok(())
}
