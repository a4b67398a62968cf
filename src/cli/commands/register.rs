//! `credvault register` — create a user account.

use crate::cli::output;
use crate::cli::{open_app, prompt_new_password, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `register` command.
pub fn execute(cli: &Cli, username: &str) -> Result<()> {
    let app = open_app(cli)?;

    // Fail before prompting if the name is already taken.
    if app.auth.user_exists(username)? {
        app.record("register", None, None, "conflict");
        return Err(CredVaultError::Conflict(format!(
            "User '{username}' already exists"
        )));
    }

    let password = prompt_new_password()?;
    let user = app.auth.register(username, &password)?;

    app.record("register", Some(&user.id), None, "ok");
    output::success(&format!("User '{}' registered", user.username));
    output::tip(&format!("Run `credvault login {username}` to get a token."));

    Ok(())
}
