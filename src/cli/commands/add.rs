//! `credvault add` — store a new vault entry.

use crate::cli::output;
use crate::cli::{open_app, require_user, secret_value, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, username: &str, secret: Option<&str>) -> Result<()> {
    let app = open_app(cli)?;
    let user_id = require_user(cli, &app)?;

    let secret = secret_value(secret, site)?;
    let entry = app.vault.add(&user_id, site, username, &secret)?;

    app.record("add", Some(&user_id), Some(&entry.id), "ok");
    output::success(&format!("Saved entry {} for {site}", entry.id));

    Ok(())
}
