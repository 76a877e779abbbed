use crate::error::VaultError;
use crate::types::{KEY_LEN, SALT_LEN};
use getrandom::fill;
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Minimum accepted master secret length, in characters.
pub const MIN_MASTER_KEY_LEN: usize = 64;

/// The process-wide master secret.
///
/// Owned by the cipher once built, immutable afterwards, and wiped on drop. The
/// string is used as-is in the scrypt password, so a hex secret is never decoded.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(String);

impl MasterKey {
    /// Wraps a master secret.
    ///
    /// # Errors
    /// Returns [`VaultError::KeyTooShort`] if the secret has fewer than
    /// [`MIN_MASTER_KEY_LEN`] characters.
    pub fn new(secret: impl Into<String>) -> Result<Self, VaultError> {
        let mut secret = secret.into();
        let len = secret.chars().count();
        if len < MIN_MASTER_KEY_LEN {
            secret.zeroize();
            return Err(VaultError::KeyTooShort {
                message: format!("got {len} characters, need at least {MIN_MASTER_KEY_LEN}")
                    .into(),
                context: None,
            });
        }
        Ok(Self(secret))
    }

    /// Generates a fresh secret: 32 random bytes, hex encoded.
    ///
    /// # Errors
    /// Returns [`VaultError::Internal`] if the OS random source is unavailable.
    pub fn generate() -> Result<Self, VaultError> {
        let mut raw = Zeroizing::new([0u8; KEY_LEN]);
        fill(&mut raw[..]).map_err(|e| VaultError::Internal {
            message: e.to_string().into(),
            context: Some("Generating master key".into()),
        })?;
        Ok(Self(hex::encode(&raw[..])))
    }

    /// The secret itself. Only for handing a freshly generated key to an operator.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn password(&self, tenant_id: &str) -> Zeroizing<Vec<u8>> {
        let mut password = Zeroizing::new(Vec::with_capacity(self.0.len() + tenant_id.len() + 1));
        password.extend_from_slice(self.0.as_bytes());
        password.push(b':');
        password.extend_from_slice(tenant_id.as_bytes());
        password
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

/// scrypt cost parameters.
///
/// The defaults (`N = 2^14, r = 8, p = 1`) are part of the stored format: values
/// written under one set of parameters only decrypt under the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { log_n: 14, r: 8, p: 1 }
    }
}

impl KdfParams {
    pub(crate) fn to_scrypt(self) -> Result<scrypt::Params, VaultError> {
        scrypt::Params::new(self.log_n, self.r, self.p, KEY_LEN).map_err(|e| {
            VaultError::InvalidConfiguration {
                message: e.to_string().into(),
                context: Some(format!("log_n={} r={} p={}", self.log_n, self.r, self.p).into()),
            }
        })
    }
}

/// A tenant-scoped AES-256 key. Never leaves the crate.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Runs scrypt over `"{master}:{tenant}"` with the given salt.
pub(crate) fn derive_key(
    master: &MasterKey,
    tenant_id: &str,
    salt: &[u8; SALT_LEN],
    params: &scrypt::Params,
) -> Result<DerivedKey, VaultError> {
    let password = master.password(tenant_id);
    let mut key = DerivedKey([0u8; KEY_LEN]);
    scrypt::scrypt(&password, salt, params, &mut key.0).map_err(|e| VaultError::Internal {
        message: e.to_string().into(),
        context: Some("scrypt".into()),
    })?;
    Ok(key)
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    tenant_id: Arc<str>,
    salt: [u8; SALT_LEN],
}

/// Bounded cache of derived keys, keyed by `(tenant, salt)`.
///
/// A cached key is only ever returned for the exact tenant and salt it was derived
/// from, so tenants never share entries.
#[derive(Clone)]
pub(crate) struct KeyCache {
    inner: Cache<CacheKey, Arc<DerivedKey>>,
}

impl KeyCache {
    pub(crate) fn new(capacity: u64) -> Self {
        Self { inner: Cache::new(capacity) }
    }

    pub(crate) fn get_or_derive(
        &self,
        tenant_id: &str,
        salt: &[u8; SALT_LEN],
        derive: impl FnOnce() -> Result<DerivedKey, VaultError>,
    ) -> Result<Arc<DerivedKey>, VaultError> {
        let key = CacheKey { tenant_id: Arc::from(tenant_id), salt: *salt };
        self.inner.try_get_with(key, || derive().map(Arc::new)).map_err(|e| VaultError::Internal {
            message: e.to_string().into(),
            context: Some("Key cache".into()),
        })
    }

    pub(crate) fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCache").field("entries", &self.inner.entry_count()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> scrypt::Params {
        KdfParams { log_n: 4, r: 8, p: 1 }.to_scrypt().unwrap()
    }

    #[test]
    fn rejects_short_master_key() {
        let err = MasterKey::new("a".repeat(63)).unwrap_err();
        assert!(matches!(err, VaultError::KeyTooShort { .. }));
        assert!(MasterKey::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn generated_key_is_64_hex_chars() {
        let key = MasterKey::generate().unwrap();
        assert_eq!(key.expose().len(), 64);
        assert!(key.expose().bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(key.expose(), MasterKey::generate().unwrap().expose());
    }

    #[test]
    fn debug_is_redacted() {
        let key = MasterKey::new("s".repeat(64)).unwrap();
        assert_eq!(format!("{key:?}"), "MasterKey(<redacted>)");
    }

    #[test]
    fn derivation_depends_on_tenant_and_salt() {
        let master = MasterKey::new("m".repeat(64)).unwrap();
        let params = cheap();
        let salt = [7u8; SALT_LEN];

        let a = derive_key(&master, "t-1", &salt, &params).unwrap();
        let b = derive_key(&master, "t-1", &salt, &params).unwrap();
        let c = derive_key(&master, "t-2", &salt, &params).unwrap();
        let d = derive_key(&master, "t-1", &[8u8; SALT_LEN], &params).unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
        assert_ne!(a.as_bytes(), d.as_bytes());
    }

    #[test]
    fn password_joins_master_and_tenant() {
        let master = MasterKey::new("k".repeat(64)).unwrap();
        let password = master.password("t-1");
        assert_eq!(password.as_slice(), format!("{}:t-1", "k".repeat(64)).as_bytes());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = KdfParams { log_n: 14, r: 0, p: 1 }.to_scrypt().unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfiguration { .. }));
    }

    #[test]
    fn cache_is_scoped_by_tenant_and_salt() {
        let master = MasterKey::new("m".repeat(64)).unwrap();
        let params = cheap();
        let cache = KeyCache::new(16);
        let salt = [1u8; SALT_LEN];

        let first = cache.get_or_derive("t-1", &salt, || derive_key(&master, "t-1", &salt, &params));
        let again = cache.get_or_derive("t-1", &salt, || panic!("should be cached"));
        assert!(Arc::ptr_eq(&first.unwrap(), &again.unwrap()));

        let other = cache
            .get_or_derive("t-2", &salt, || derive_key(&master, "t-2", &salt, &params))
            .unwrap();
        let cached = cache.get_or_derive("t-1", &salt, || panic!("should be cached")).unwrap();
        assert_ne!(other.as_bytes(), cached.as_bytes());
        assert_eq!(cache.entry_count(), 2);
    }
}
