//! `credvault list` — display your vault entries in a table.

use crate::cli::output;
use crate::cli::{open_app, require_user, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, reveal: bool) -> Result<()> {
    let app = open_app(cli)?;
    let user_id = require_user(cli, &app)?;

    let entries = app.vault.list(&user_id)?;

    output::info(&format!("{} entr(ies)", entries.len()));
    output::print_entries_table(&entries, reveal);

    if !reveal && !entries.is_empty() {
        output::tip("Pass --reveal to show secrets.");
    }

    Ok(())
}
