use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_PREFIX: &str = "VAUDIT";
const DEFAULT_FILE: &str = "vaudit";

#[vaudit_derive::vaudit_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file overlaid with environment variables.
///
/// 1. **File**: `path`, or `vaudit.{toml,json,yaml}` in the working directory when `None`.
///    An explicit path must exist; the implicit default file is optional.
/// 2. **Environment**: variables prefixed with `VAUDIT__`, nested with `__`
///    (e.g. `VAUDIT__BYPASS__PIN=4711` sets `bypass.pin`).
///
/// Fields missing from both layers fall back to the target type's serde defaults.
///
/// # Errors
/// Returns [`ConfigError::Config`] when an explicit file is missing, a source is malformed,
/// or the merged values do not deserialize into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
