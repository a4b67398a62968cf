//! `credvault whoami` — show the identity behind the current token.

use chrono::{TimeZone, Utc};

use crate::cli::output;
use crate::cli::{open_app, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `whoami` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let app = open_app(cli)?;
    let claims = cli
        .token
        .as_deref()
        .and_then(|t| app.auth.claims(t))
        .ok_or(CredVaultError::AuthenticationFailed)?;

    let expires = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| claims.exp.to_string());

    output::info(&format!(
        "{} (user id {}), token valid until {expires}",
        claims.username, claims.user_id
    ));

    Ok(())
}
