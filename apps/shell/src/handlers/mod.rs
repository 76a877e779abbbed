pub mod records;
pub mod registry;
pub mod values;

use anyhow::{Context, bail};
use chub_domain::config::EncryptionConfig;
use chub_interceptor::FieldInterceptor;

/// Builds the interceptor, with a hint when the master key is not configured.
pub fn interceptor(config: &EncryptionConfig) -> anyhow::Result<FieldInterceptor> {
    if config.master_key.is_empty() {
        bail!("No master key configured. Set CHUB__ENCRYPTION__MASTER_KEY or encryption.master_key");
    }
    FieldInterceptor::from_config(config).context("Initializing field encryption")
}
