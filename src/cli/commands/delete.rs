//! `credvault delete` — remove a vault entry.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_app, require_user, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let app = open_app(cli)?;
    let user_id = require_user(cli, &app)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry {id}?"))
            .default(false)
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !app.vault.delete(&user_id, id)? {
        app.record("delete", Some(&user_id), Some(id), "not found");
        return Err(CredVaultError::NotFound);
    }

    app.record("delete", Some(&user_id), Some(id), "ok");
    output::success(&format!("Deleted entry {id}"));

    Ok(())
}
