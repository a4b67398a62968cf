//! Configuration loaded from `credvault.toml` and the environment.

pub mod settings;

pub use settings::Settings;
