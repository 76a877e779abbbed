use chub_domain::config::AppConfig;
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name of the config file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "carehub";

/// Prefix of environment overrides, e.g. `CHUB__ENCRYPTION__MASTER_KEY`.
pub const ENV_PREFIX: &str = "CHUB";

/// Custom error type for config loading.
#[chub_derive::chub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (TOML, YAML, JSON... by extension). An
///    explicit path must exist; without one, `carehub.*` in the working directory is
///    read if present.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `CHUB__`.
///    Nested structures are accessed using double underscores (e.g. `CHUB__ENCRYPTION__MASTER_KEY`
///    maps to `encryption.master_key`).
///
/// # Errors
/// This function will return an error if:
/// * An explicitly given configuration file cannot be found.
/// * The merged content does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use chub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     workers: u16,
/// }
///
/// let cfg: Settings = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Like [`load_config`], but reads overrides from `vars` instead of the process
/// environment. Keys keep the `CHUB__` form, e.g. `CHUB__LOGGING__JSON`.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T, I, K, V>(
    path: Option<impl AsRef<Path>>,
    vars: I,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect::<Map<_, _>>();
    load_layered(path, Some(vars))
}

fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        );

    if required {
        info!("Loading config from {}", effective_path.display());
    } else {
        debug!("Loading optional config from {}", effective_path.display());
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the application config: file, then `CHUB__` overrides, then defaults.
///
/// # Errors
/// See [`load_config`].
pub fn load_app_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    load_config::<AppConfig>(path)
}
