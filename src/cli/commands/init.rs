//! `credvault init` — create the data directory, stores and key.

use crate::app::App;
use crate::cli::output;
use crate::cli::{settings, Cli};
use crate::errors::Result;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = settings(cli)?;
    let key_existed = settings.key_path().exists();

    let app = App::open(&settings)?;
    let dir_display = app.data_dir().display();

    if key_existed {
        output::info(&format!("Using existing vault at {dir_display}"));
    } else {
        output::success(&format!("Vault initialized at {dir_display}"));
        output::warning("Back up encryption.key — without it no stored secret can be read.");
    }

    if settings.token_secret.as_deref().map_or(true, str::is_empty) {
        output::warning(&format!(
            "No token secret configured — set {} before sharing this vault.",
            crate::config::Settings::TOKEN_SECRET_ENV
        ));
    }

    app.record("init", None, None, "ok");
    output::tip("Run `credvault register <USERNAME>` to create an account.");

    Ok(())
}
