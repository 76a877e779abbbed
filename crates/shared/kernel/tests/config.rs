use chub_domain::config::TenantPolicy;
use chub_domain::config::AppConfig;
use chub_kernel::config::{ConfigError, load_app_config, load_config, load_config_with_env};
use serial_test::serial;
use std::io::Write;
use std::path::Path;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("carehub.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
#[serial]
fn loads_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[encryption]
master_key = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
tenant_policy = "strict"
max_concurrency = 3

[[encryption.registry]]
entity = "Resident"
fields = ["cpf", "rg"]

[logging]
level = "debug"
"#,
    );

    let cfg = load_app_config(Some(&path)).unwrap();
    assert_eq!(cfg.encryption.master_key.len(), 64);
    assert_eq!(cfg.encryption.tenant_policy, TenantPolicy::Strict);
    assert_eq!(cfg.encryption.max_concurrency, 3);
    assert_eq!(cfg.encryption.registry.len(), 1);
    assert_eq!(cfg.encryption.registry[0].fields, ["cpf", "rg"]);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn missing_sections_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[logging]\njson = true\n");

    let cfg = load_app_config(Some(&path)).unwrap();
    assert!(cfg.logging.json);
    assert_eq!(cfg.encryption.registry.len(), 7);
    assert_eq!(cfg.encryption.kdf.log_n, 14);
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_app_config(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}

#[test]
#[serial]
fn no_path_falls_back_to_defaults() {
    #[derive(serde::Deserialize, Default)]
    #[serde(default)]
    struct Settings {
        workers: u16,
    }

    let cfg: Settings = load_config(None::<&Path>).unwrap();
    assert_eq!(cfg.workers, 0);
}

#[test]
#[serial]
fn env_overrides_parse_numbers_and_booleans() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[logging]\nlevel = \"warn\"\n");

    let cfg: AppConfig = load_config_with_env(
        Some(&path),
        [
            ("CHUB__ENCRYPTION__KDF__LOG_N", "8"),
            ("CHUB__ENCRYPTION__MAX_CONCURRENCY", "2"),
            ("CHUB__ENCRYPTION__KEY_CACHE_CAPACITY", "512"),
            ("CHUB__ENCRYPTION__TENANT_POLICY", "strict"),
            ("CHUB__LOGGING__JSON", "true"),
            ("CHUB__LOGGING__CONSOLE", "false"),
        ],
    )
    .unwrap();

    assert_eq!(cfg.encryption.kdf.log_n, 8);
    assert_eq!(cfg.encryption.kdf.r, 8);
    assert_eq!(cfg.encryption.max_concurrency, 2);
    assert_eq!(cfg.encryption.key_cache_capacity, 512);
    assert_eq!(cfg.encryption.tenant_policy, TenantPolicy::Strict);
    assert!(cfg.logging.json);
    assert!(!cfg.logging.console);
    assert_eq!(cfg.logging.level, "warn");
}

#[test]
#[serial]
fn env_master_key_stays_a_string() {
    let digits = "1234567890".repeat(7);
    let cfg: AppConfig =
        load_config_with_env(None::<&Path>, [("CHUB__ENCRYPTION__MASTER_KEY", digits.as_str())])
            .unwrap();
    assert_eq!(cfg.encryption.master_key, digits);
}

#[test]
#[serial]
fn malformed_env_number_is_an_error() {
    let err = load_config_with_env::<AppConfig, _, _, _>(
        None::<&Path>,
        [("CHUB__ENCRYPTION__KDF__LOG_N", "fourteen")],
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}
