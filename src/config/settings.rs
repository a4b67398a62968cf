use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{Argon2Params, HashScheme};
use crate::errors::{CredVaultError, Result};

/// Token secret used when none is configured.  Fine for local testing,
/// never for a shared deployment.
pub const DEV_TOKEN_SECRET: &str = "your-secret-key-change-this-in-production";

/// Process configuration, loaded from `credvault.toml`.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding `users.json`, `passwords.json` and `encryption.key`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// HMAC secret for bearer tokens.
    #[serde(default)]
    pub token_secret: Option<String>,

    /// Token lifetime in seconds (default: 24 hours).
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Hash scheme for newly registered users.
    #[serde(default)]
    pub password_scheme: HashScheme,

    /// Argon2 memory cost in KiB (only used with `password_scheme = "argon2id"`).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_token_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_argon2_memory_kib() -> u32 {
    19_456 // 19 MB
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            token_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            password_scheme: HashScheme::default(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = "credvault.toml";

    /// Environment variable overriding `data_dir`.
    pub const DATA_DIR_ENV: &'static str = "CREDVAULT_DATA_DIR";

    /// Environment variable overriding `token_secret`.
    pub const TOKEN_SECRET_ENV: &'static str = "CREDVAULT_TOKEN_SECRET";

    /// Load settings from `<dir>/credvault.toml`, then apply environment
    /// overrides.
    ///
    /// If the file does not exist, sensible defaults are used.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut settings = Self::load_file(dir)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load only the config file, without environment overrides.
    pub fn load_file(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests).  Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(Self::DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = dir;
        }
        if let Some(secret) = lookup(Self::TOKEN_SECRET_ENV).filter(|v| !v.is_empty()) {
            self.token_secret = Some(secret);
        }
    }

    /// The token secret, falling back to the development default.  An
    /// empty configured secret counts as none.
    pub fn token_secret(&self) -> &str {
        match self.token_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "no token secret configured; set {} before exposing this vault",
                    Self::TOKEN_SECRET_ENV
                );
                DEV_TOKEN_SECRET
            }
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir().join("passwords.json")
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir().join("encryption.key")
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
