use aead::inout::InOutBuf;
use aead::{AeadInOut, KeyInit, Nonce, Tag};
use getrandom::fill;
use std::sync::Arc;
use tracing::trace;
use zeroize::Zeroizing;

use crate::builder::FieldCipherBuilder;
use crate::error::{VaultError, VaultErrorExt};
use crate::key::{DerivedKey, KeyCache, MasterKey, derive_key};
use crate::types::{EncryptedField, FieldAes, NONCE_LEN, SALT_LEN, TAG_LEN, is_encrypted};

#[allow(unreachable_pub)]
#[derive(Debug)]
pub struct FieldCipherInner {
    pub(crate) master: MasterKey,
    pub(crate) params: scrypt::Params,
    pub(crate) cache: Option<KeyCache>,
}

/// Tenant-scoped field encryption engine.
///
/// Every value gets a fresh 64-byte salt and 16-byte nonce; the AES-256 key is
/// derived per value with scrypt from `"{master}:{tenant}"`, so a value only opens
/// under the master key and tenant that produced it.
///
/// The handle wraps its state in an [`Arc`]; clone it freely into worker threads.
/// Both directions are CPU-bound (one scrypt run each) and should stay off async
/// executors.
///
/// ### Example
/// ```rust
/// use chub_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let cipher = FieldCipher::builder()
///     .master_key("0123456789abcdef".repeat(4))?
///     .kdf(KdfParams { log_n: 10, r: 8, p: 1 })
///     .build()?;
///
/// let stored = cipher.encrypt("123.456.789-00", "tenant-1")?.expect("non-empty input");
/// assert!(FieldCipher::is_encrypted(&stored.to_string()));
///
/// let plain = cipher.decrypt(stored.to_string().as_str(), "tenant-1")?;
/// assert_eq!(plain.as_deref(), Some("123.456.789-00"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FieldCipher {
    pub(crate) inner: Arc<FieldCipherInner>,
}

impl FieldCipher {
    /// Returns a new [`FieldCipherBuilder`] to configure the cipher.
    #[must_use]
    pub fn builder() -> FieldCipherBuilder {
        FieldCipherBuilder::new()
    }

    /// Builds a cipher with default parameters and no key cache.
    ///
    /// # Errors
    /// Returns [`VaultError::KeyTooShort`] if the secret has fewer than 64 characters.
    pub fn new(master_key: impl Into<String>) -> Result<Self, VaultError> {
        Self::builder().master_key(master_key)?.build()
    }

    /// Structural check for an Encrypted Field Value. See [`is_encrypted`].
    #[must_use]
    #[inline]
    pub fn is_encrypted(value: &str) -> bool {
        is_encrypted(value)
    }

    /// Encrypts a field value for a tenant.
    ///
    /// # Results
    /// `None` for absent, empty or whitespace-only input, otherwise a freshly salted
    /// [`EncryptedField`].
    ///
    /// # Errors
    /// [`VaultError::EncryptionFailed`] on any derivation or cipher failure.
    pub fn encrypt<'a>(
        &self,
        plaintext: impl Into<Option<&'a str>>,
        tenant_id: &str,
    ) -> Result<Option<EncryptedField>, VaultError> {
        let Some(plaintext) = plaintext.into().filter(|p| !p.trim().is_empty()) else {
            return Ok(None);
        };
        self.seal(plaintext, tenant_id).map(Some)
    }

    /// Decrypts a stored field value for a tenant.
    ///
    /// # Results
    /// * `None` for absent, empty or whitespace-only input.
    /// * The input unchanged when it is not shaped like an Encrypted Field Value.
    /// * The plaintext otherwise.
    ///
    /// # Errors
    /// * [`VaultError::InvalidFormat`] if the value cannot be split into its parts.
    /// * [`VaultError::DecryptionFailed`] on a wrong tenant, wrong master key,
    ///   tampering, or non-UTF-8 plaintext.
    pub fn decrypt<'a>(
        &self,
        value: impl Into<Option<&'a str>>,
        tenant_id: &str,
    ) -> Result<Option<String>, VaultError> {
        let Some(value) = value.into().filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        if !is_encrypted(value) {
            trace!("Value is not encrypted, passing through");
            return Ok(Some(value.to_owned()));
        }
        let field: EncryptedField = value.parse()?;
        self.open(&field, tenant_id).map(Some)
    }

    /// Decrypts a value if it is encrypted, otherwise returns it verbatim.
    ///
    /// Unlike [`FieldCipher::decrypt`], whitespace-only text is kept as-is; only
    /// absent or empty input yields `None`. Meant for report rendering.
    ///
    /// # Errors
    /// Same as [`FieldCipher::decrypt`]; tampered values are never returned.
    pub fn reveal<'a>(
        &self,
        value: impl Into<Option<&'a str>>,
        tenant_id: &str,
    ) -> Result<Option<String>, VaultError> {
        match value.into() {
            None | Some("") => Ok(None),
            Some(value) if !is_encrypted(value) => Ok(Some(value.to_owned())),
            Some(value) => self.open(&value.parse()?, tenant_id).map(Some),
        }
    }

    /// Encrypts non-empty plaintext into an [`EncryptedField`].
    ///
    /// # Errors
    /// [`VaultError::EncryptionFailed`] on any derivation or cipher failure.
    pub fn seal(&self, plaintext: &str, tenant_id: &str) -> Result<EncryptedField, VaultError> {
        let salt: [u8; SALT_LEN] = random().context("Generating salt")?;
        let nonce: [u8; NONCE_LEN] = random().context("Generating nonce")?;

        let key = self.key_for(tenant_id, &salt).map_err(|e| VaultError::EncryptionFailed {
            message: e.to_string().into(),
            context: Some("Deriving tenant key".into()),
        })?;
        let cipher = FieldAes::new_from_slice(key.as_bytes())
            .map_err(|_| VaultError::encryption("Invalid derived key length"))?;
        let nonce_arr = Nonce::<FieldAes>::try_from(&nonce[..])
            .map_err(|_| VaultError::encryption("Invalid nonce length"))?;

        let mut buf = plaintext.as_bytes().to_vec();
        let tag = cipher
            .encrypt_inout_detached(&nonce_arr, &[], InOutBuf::from(&mut buf[..]))
            .map_err(|_| VaultError::EncryptionFailed {
                message: "Encryption failed".into(),
                context: Some("AEAD encryption failed".into()),
            })?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(EncryptedField::new(salt, nonce, tag_bytes, buf))
    }

    /// Decrypts an [`EncryptedField`] back into plaintext.
    ///
    /// # Errors
    /// [`VaultError::DecryptionFailed`] on authentication failure or non-UTF-8 plaintext.
    pub fn open(&self, field: &EncryptedField, tenant_id: &str) -> Result<String, VaultError> {
        let key = self.key_for(tenant_id, field.salt()).map_err(|e| {
            VaultError::DecryptionFailed {
                message: e.to_string().into(),
                context: Some("Deriving tenant key".into()),
            }
        })?;
        let cipher = FieldAes::new_from_slice(key.as_bytes())
            .map_err(|_| VaultError::decryption("Invalid derived key length"))?;
        let nonce = Nonce::<FieldAes>::try_from(&field.nonce()[..])
            .map_err(|_| VaultError::decryption("Invalid nonce length"))?;
        let tag = Tag::<FieldAes>::try_from(&field.tag()[..])
            .map_err(|_| VaultError::decryption("Invalid tag length"))?;

        let mut buf = Zeroizing::new(field.ciphertext().to_vec());
        cipher.decrypt_inout_detached(&nonce, &[], InOutBuf::from(&mut buf[..]), &tag).map_err(
            |_| VaultError::DecryptionFailed {
                message: "Decryption failed".into(),
                context: Some("AEAD authentication failed".into()),
            },
        )?;

        std::str::from_utf8(&buf)
            .map(str::to_owned)
            .map_err(|_| VaultError::decryption("Plaintext is not valid UTF-8"))
    }

    /// Number of derived keys currently cached; `0` when the cache is disabled.
    #[must_use]
    pub fn cached_keys(&self) -> u64 {
        self.inner.cache.as_ref().map_or(0, KeyCache::entry_count)
    }

    fn key_for(&self, tenant_id: &str, salt: &[u8; SALT_LEN]) -> Result<Arc<DerivedKey>, VaultError> {
        let inner = &*self.inner;
        let derive = || derive_key(&inner.master, tenant_id, salt, &inner.params);
        match &inner.cache {
            Some(cache) => cache.get_or_derive(tenant_id, salt, derive),
            None => derive().map(Arc::new),
        }
    }
}

fn random<const N: usize>() -> Result<[u8; N], VaultError> {
    let mut buf = [0u8; N];
    fill(&mut buf).map_err(|e| VaultError::encryption(format!("System RNG unavailable: {e}")))?;
    Ok(buf)
}
