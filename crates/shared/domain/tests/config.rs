use chub_domain::config::{AppConfig, EncryptionConfig, KdfConfig, LoggingConfig, TenantPolicy};
use chub_domain::constants::RESIDENT;
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let encryption = EncryptionConfig::default();
    assert!(encryption.master_key.is_empty());
    assert_eq!(encryption.tenant_policy, TenantPolicy::Lenient);
    assert_eq!(encryption.max_concurrency, 0);
    assert_eq!(encryption.key_cache_capacity, 0);
    assert_eq!(encryption.kdf, KdfConfig { log_n: 14, r: 8, p: 1 });
    assert_eq!(encryption.registry.len(), 7);

    let resident = encryption.registry.iter().find(|e| e.entity == RESIDENT).unwrap();
    assert_eq!(
        resident.fields,
        ["cpf", "rg", "cns", "legal_guardian_cpf", "legal_guardian_rg"]
    );

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "encryption": {
            "master_key": "k".repeat(64),
            "tenant_policy": "strict",
            "max_concurrency": 2,
            "registry": [{ "entity": "Resident", "fields": ["cpf"] }]
        },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.encryption.tenant_policy, TenantPolicy::Strict);
    assert_eq!(cfg.encryption.max_concurrency, 2);
    assert_eq!(cfg.encryption.registry.len(), 1);
    assert_eq!(cfg.encryption.kdf.log_n, 14);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
}

#[test]
fn debug_output_hides_master_key() {
    let config = EncryptionConfig { master_key: "s3cr3t".repeat(11), ..Default::default() };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn config_clone_on_write() {
    let shared = AppConfig::default();
    let mut changed = shared.clone();
    changed.encryption.key_cache_capacity = 128;

    assert_eq!(shared.encryption.key_cache_capacity, 0);
    assert_eq!(changed.encryption.key_cache_capacity, 128);
}
