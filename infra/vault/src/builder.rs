use crate::engine::{FieldCipher, FieldCipherInner};
use crate::error::{VaultError, VaultErrorExt};
use crate::key::{KdfParams, KeyCache, MasterKey};
use private::Sealed;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct NoKey;
#[derive(Debug)]
pub struct WithKey(MasterKey);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for [`FieldCipher`].
///
/// The master key has to be supplied before `build` becomes available; the key is
/// moved into the cipher and wiped when the last handle is dropped.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct FieldCipherBuilder<K: Sealed = NoKey> {
    kdf: KdfParams,
    key_cache_capacity: u64,
    key: K,
}

impl Default for FieldCipherBuilder {
    fn default() -> Self {
        Self { kdf: KdfParams::default(), key_cache_capacity: 0, key: NoKey }
    }
}

impl FieldCipherBuilder {
    /// Creates a new empty builder.
    ///
    /// # Results
    /// Returns a fresh [`FieldCipherBuilder`] with default scrypt parameters and no key cache.
    #[must_use = "Builder must be given a master key before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the master secret.
    ///
    /// # Errors
    /// Returns [`VaultError::KeyTooShort`] if the secret has fewer than 64 characters.
    pub fn master_key(
        self,
        secret: impl Into<String>,
    ) -> Result<FieldCipherBuilder<WithKey>, VaultError> {
        let key = MasterKey::new(secret).context("Building field cipher")?;
        Ok(self.with_master_key(key))
    }

    /// Uses an already validated [`MasterKey`].
    #[must_use]
    pub fn with_master_key(self, key: MasterKey) -> FieldCipherBuilder<WithKey> {
        FieldCipherBuilder {
            kdf: self.kdf,
            key_cache_capacity: self.key_cache_capacity,
            key: WithKey(key),
        }
    }
}

#[allow(private_bounds)]
impl<K: Sealed> FieldCipherBuilder<K> {
    /// Overrides the scrypt cost parameters.
    ///
    /// Values only decrypt under the parameters they were written with; leave the
    /// defaults in place for anything that touches stored data.
    #[must_use]
    pub const fn kdf(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    /// Enables a bounded cache of derived keys, keyed by `(tenant, salt)`.
    ///
    /// `0` disables it (the default).
    #[must_use]
    pub const fn key_cache(mut self, capacity: u64) -> Self {
        self.key_cache_capacity = capacity;
        self
    }
}

impl FieldCipherBuilder<WithKey> {
    /// Finalizes cipher construction.
    ///
    /// # Results
    /// Returns a fully initialized, cheaply clonable [`FieldCipher`].
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the scrypt parameters are invalid.
    pub fn build(self) -> Result<FieldCipher, VaultError> {
        let params = self.kdf.to_scrypt()?;
        let cache = (self.key_cache_capacity > 0).then(|| KeyCache::new(self.key_cache_capacity));
        let WithKey(master) = self.key;

        Ok(FieldCipher { inner: Arc::new(FieldCipherInner { master, params, cache }) })
    }
}
