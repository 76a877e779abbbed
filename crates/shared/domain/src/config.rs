use crate::constants::DEFAULT_SENSITIVE_FIELDS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub encryption: EncryptionConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
///
/// Deserialized through [`AppConfigInner`] so string sources (environment
/// variables) still see the target field types.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(from = "AppConfigInner")]
pub struct AppConfig {
    inner: Arc<AppConfigInner>,
}

impl From<AppConfigInner> for AppConfig {
    fn from(inner: AppConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Field encryption settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Master secret, at least 64 characters. Usually supplied through
    /// `CHUB__ENCRYPTION__MASTER_KEY` rather than the config file.
    pub master_key: String,
    pub tenant_policy: TenantPolicy,
    /// Upper bound on concurrent key derivations; `0` means available parallelism.
    pub max_concurrency: usize,
    /// Derived keys kept per `(tenant, salt)`; `0` disables the cache.
    pub key_cache_capacity: u64,
    pub kdf: KdfConfig,
    pub registry: Vec<RegistryEntry>,
}

/// What the write path does when it cannot find a tenant for a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantPolicy {
    /// Skip encryption for the payload and log a warning.
    #[default]
    Lenient,
    /// Reject the write.
    Strict,
}

/// scrypt cost parameters. Changing them makes existing values undecryptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// One entity and the names of its sensitive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub entity: String,
    pub fields: Vec<String>,
}

/// Subscriber settings for the process logger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub json: bool,
}

// --- Default ---

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            master_key: String::new(),
            tenant_policy: TenantPolicy::default(),
            max_concurrency: 0,
            key_cache_capacity: 0,
            kdf: KdfConfig::default(),
            registry: default_registry(),
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self { log_n: 14, r: 8, p: 1 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            directory: None,
            file_prefix: "carehub".to_owned(),
            json: false,
        }
    }
}

/// The production registry.
#[must_use]
pub fn default_registry() -> Vec<RegistryEntry> {
    DEFAULT_SENSITIVE_FIELDS
        .iter()
        .map(|(entity, fields)| RegistryEntry {
            entity: (*entity).to_owned(),
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
        })
        .collect()
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("master_key", &"<redacted>")
            .field("tenant_policy", &self.tenant_policy)
            .field("max_concurrency", &self.max_concurrency)
            .field("key_cache_capacity", &self.key_cache_capacity)
            .field("kdf", &self.kdf)
            .field("registry", &self.registry)
            .finish()
    }
}
