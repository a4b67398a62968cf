//! AES-256-CBC encryption of vault secrets.
//!
//! Each call to `encrypt` generates a fresh random 16-byte IV and
//! prepends it to the PKCS#7-padded ciphertext.  The whole buffer is
//! returned as a standard base64 string so it can live in a JSON field.
//!
//! Layout of the decoded buffer:
//!   [ 16-byte IV | ciphertext (multiple of 16 bytes) ]

use std::fs;
use std::path::Path;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{CredVaultError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the symmetric key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of the CBC initialization vector (one AES block).
const IV_LEN: usize = 16;

/// AES block size.
const BLOCK_LEN: usize = 16;

/// The process-wide vault key.  Zeroed when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct CipherKey {
    bytes: [u8; KEY_LEN],
}

impl CipherKey {
    /// Wrap raw key bytes (tests use this to inject a fixed key).
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Read the key at `path`, or generate and persist one if the file
    /// does not exist yet.
    ///
    /// The file holds the base64 encoding of the raw key bytes.
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let key = Self::generate();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CredVaultError::KeyError(format!("cannot create key directory: {e}"))
                })?;
            }
        }

        let encoded = Zeroizing::new(BASE64.encode(key.bytes));
        fs::write(path, encoded.as_bytes())
            .map_err(|e| CredVaultError::KeyError(format!("failed to write key file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).map_err(|e| {
                CredVaultError::KeyError(format!("failed to set key file permissions: {e}"))
            })?;
        }

        tracing::info!(path = %path.display(), "generated new encryption key");
        Ok(key)
    }

    /// Load an existing key file and validate its length.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = Zeroizing::new(
            fs::read_to_string(path)
                .map_err(|e| CredVaultError::KeyError(format!("failed to read key file: {e}")))?,
        );

        let mut decoded = BASE64
            .decode(contents.trim())
            .map_err(|_| CredVaultError::KeyError("key file is not valid base64".into()))?;

        if decoded.len() != KEY_LEN {
            let len = decoded.len();
            decoded.zeroize();
            return Err(CredVaultError::KeyError(format!(
                "key must be exactly {KEY_LEN} bytes, got {len}"
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();

        tracing::debug!(path = %path.display(), "loaded encryption key");
        Ok(Self { bytes })
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Encrypt `plaintext` and return `base64(IV || ciphertext)`.
pub fn encrypt(key: &CipherKey, plaintext: &str) -> Result<String> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);

    let encryptor = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;
    let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(output))
}

/// Decrypt a string produced by `encrypt`.
pub fn decrypt(key: &CipherKey, encoded: &str) -> Result<String> {
    let data = BASE64
        .decode(encoded.trim())
        .map_err(|_| CredVaultError::DecryptionFailed)?;

    // At least the IV plus one padded block.
    if data.len() < IV_LEN + BLOCK_LEN || (data.len() - IV_LEN) % BLOCK_LEN != 0 {
        return Err(CredVaultError::DecryptionFailed);
    }

    let (iv, ciphertext) = data.split_at(IV_LEN);
    let decryptor = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CredVaultError::DecryptionFailed)?;

    // A wrong key almost always shows up here as bad padding.
    let plaintext = decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CredVaultError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CredVaultError::DecryptionFailed
    })
}
