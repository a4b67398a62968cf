//! Decrypted view of a vault entry handed back to its owner.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A vault entry with its secret in plaintext.
///
/// Serializes with the field names clients already expect
/// (`password` for the secret).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedEntry {
    pub id: String,
    pub site: String,
    pub username: String,
    #[serde(rename = "password")]
    pub secret: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
