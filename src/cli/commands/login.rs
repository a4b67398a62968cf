//! `credvault login` — check credentials and print a bearer token.

use crate::cli::output;
use crate::cli::{open_app, prompt_password, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `login` command.
pub fn execute(cli: &Cli, username: &str, raw: bool) -> Result<()> {
    let app = open_app(cli)?;
    let password = prompt_password()?;

    let Some(token) = app.auth.authenticate(username, &password)? else {
        app.record("login", None, None, "rejected");
        return Err(CredVaultError::AuthenticationFailed);
    };

    let user_id = app.auth.validate(&token);
    app.record("login", user_id.as_deref(), None, "ok");

    if raw {
        println!("{token}");
        return Ok(());
    }

    output::success(&format!("Logged in as '{username}'"));
    println!("{token}");
    output::tip("export CREDVAULT_TOKEN=<token> to use it with the other commands.");

    Ok(())
}
