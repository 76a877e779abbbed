use super::interceptor;
use anyhow::Context;
use chub_domain::config::EncryptionConfig;
use chub_vault::{EncryptedField, MasterKey, is_encrypted};
use std::io::Read;
use std::process::ExitCode;

pub fn keygen() -> anyhow::Result<()> {
    let key = MasterKey::generate().context("Generating master key")?;
    println!("{}", key.expose());
    Ok(())
}

pub fn encrypt(
    config: &EncryptionConfig,
    tenant: &str,
    value: Option<String>,
) -> anyhow::Result<()> {
    let value = value_or_stdin(value)?;
    let interceptor = interceptor(config)?;
    let sealed = interceptor.cipher().encrypt(value.as_str(), tenant)?;
    println!("{}", sealed.map(|field| field.to_string()).unwrap_or_default());
    Ok(())
}

pub fn decrypt(
    config: &EncryptionConfig,
    tenant: &str,
    value: Option<String>,
) -> anyhow::Result<()> {
    let value = value_or_stdin(value)?;
    let interceptor = interceptor(config)?;
    let plaintext = interceptor
        .cipher()
        .decrypt(value.as_str(), tenant)
        .with_context(|| format!("Decrypting for tenant {tenant}"))?;
    println!("{}", plaintext.unwrap_or_default());
    Ok(())
}

/// Exit code 1 means "not an encrypted field value", so scripts can branch on it.
pub fn inspect(value: Option<String>) -> anyhow::Result<ExitCode> {
    let value = value_or_stdin(value)?;
    if !is_encrypted(&value) {
        println!("encrypted: no");
        return Ok(ExitCode::FAILURE);
    }
    let field: EncryptedField = value.parse()?;
    println!("encrypted: yes");
    println!("salt: {} bytes", field.salt().len());
    println!("nonce: {} bytes", field.nonce().len());
    println!("tag: {} bytes", field.tag().len());
    println!("ciphertext: {} bytes", field.ciphertext().len());
    Ok(ExitCode::SUCCESS)
}

fn value_or_stdin(value: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).context("Reading value from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_owned())
}
