//! `credvault update` — replace an existing vault entry.

use crate::cli::output;
use crate::cli::{open_app, require_user, secret_value, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `update` command.
pub fn execute(
    cli: &Cli,
    id: &str,
    site: &str,
    username: &str,
    secret: Option<&str>,
) -> Result<()> {
    let app = open_app(cli)?;
    let user_id = require_user(cli, &app)?;

    let secret = secret_value(secret, site)?;
    if !app.vault.update(&user_id, id, site, username, &secret)? {
        app.record("update", Some(&user_id), Some(id), "not found");
        return Err(CredVaultError::NotFound);
    }

    app.record("update", Some(&user_id), Some(id), "ok");
    output::success(&format!("Updated entry {id}"));

    Ok(())
}
