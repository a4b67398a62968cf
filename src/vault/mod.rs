//! Vault module — encrypted per-user secret entries.
//!
//! This module provides:
//! - The plaintext `DecryptedEntry` view returned to owners (`entry`)
//! - `VaultManager`, the owner-scoped CRUD layer (`manager`)

pub mod entry;
pub mod manager;

pub use entry::DecryptedEntry;
pub use manager::VaultManager;
