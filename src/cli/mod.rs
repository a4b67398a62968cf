//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::app::App;
use crate::config::Settings;
use crate::errors::{CredVaultError, Result};

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "CREDVAULT_PASSWORD";

/// credvault CLI: self-hosted credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Self-hosted credential vault with encrypted entries",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides credvault.toml and CREDVAULT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Bearer token from `credvault login`
    #[arg(long, env = "CREDVAULT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the data directory, empty stores and the encryption key
    Init,

    /// Register a new user
    Register {
        /// Username (case-sensitive)
        username: String,
    },

    /// Log in and print a bearer token
    Login {
        /// Username
        username: String,
        /// Print only the token (for `export CREDVAULT_TOKEN=$(...)`)
        #[arg(long)]
        raw: bool,
    },

    /// Show who the current token belongs to
    Whoami,

    /// List your vault entries
    List {
        /// Show secrets in clear text instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Add a vault entry
    Add {
        /// Site or service name
        site: String,
        /// Account username on that site
        username: String,
        /// Secret value (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Replace a vault entry
    Update {
        /// Entry id (see `credvault list`)
        id: String,
        /// Site or service name
        site: String,
        /// Account username on that site
        username: String,
        /// Secret value (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Delete a vault entry
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of your operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve settings: `credvault.toml` in the working directory, then the
/// environment, then `--data-dir`.
pub fn settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    Ok(settings)
}

/// Open the vault described by the CLI arguments.
pub fn open_app(cli: &Cli) -> Result<App> {
    App::open(&settings(cli)?)
}

/// Validate `--token` and return the user id it carries.
pub fn require_user(cli: &Cli, app: &App) -> Result<String> {
    let token = cli.token.as_deref().ok_or_else(|| {
        CredVaultError::CommandFailed(
            "no token — run `credvault login <username>` and pass --token or set CREDVAULT_TOKEN"
                .into(),
        )
    })?;

    app.auth
        .validate(token)
        .ok_or(CredVaultError::AuthenticationFailed)
}

/// Get an account password, trying `CREDVAULT_PASSWORD` first and then an
/// interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `register`).
///
/// Also respects `CREDVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let password = dialoguer::Password::new()
        .with_prompt("Choose password")
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(password))
}

/// Take a secret from the command line, or prompt for it.
pub fn secret_value(inline: Option<&str>, site: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Secret provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(format!("Secret for {site}"))
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}
