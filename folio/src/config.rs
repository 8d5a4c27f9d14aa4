//! Layered configuration: defaults, then an optional TOML file, then
//! `FOLIO_*` environment variables, then command-line flags.

use config::{Config, Environment, File, FileFormat};
use folio_scanner::urls::parse_base_url;
use folio_scanner::{DEFAULT_BASE_URL, GenreIndex, PageFetcher, ScanError, Storefront};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const ENV_PREFIX: &str = "FOLIO";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Build(#[from] config::ConfigError),

    #[error("config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("invalid base_url: {0}")]
    BaseUrl(#[source] ScanError),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub listen_addr: String,
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub genre_ttl_secs: Option<u64>,
}

/// Values supplied on the command line; `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub listen_addr: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn genre_ttl(&self) -> Option<Duration> {
        self.genre_ttl_secs.map(Duration::from_secs)
    }

    /// A storefront client with this configuration's timeout and genre cache policy.
    pub fn storefront(&self) -> Result<Storefront, ScanError> {
        let genres = GenreIndex::new().with_max_age(self.genre_ttl());
        Ok(Storefront::new(&self.base_url)?
            .with_fetcher(PageFetcher::with_timeout(self.timeout())?)
            .with_genre_index(Arc::new(genres)))
    }
}

pub fn load(overrides: &ConfigOverrides) -> Result<AppConfig, ConfigError> {
    load_with_env(overrides, None)
}

/// Like [`load`], reading environment variables from `env` instead of the
/// process environment when given.
pub fn load_with_env(
    overrides: &ConfigOverrides,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

    builder = match &overrides.config_file {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            if !expanded.exists() {
                return Err(ConfigError::MissingFile(expanded));
            }
            builder.add_source(File::from(expanded).format(FileFormat::Toml))
        }
        None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
    };

    let cfg: AppConfig = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        )
        .set_override_option("listen_addr", overrides.listen_addr.clone())?
        .set_override_option("base_url", overrides.base_url.clone())?
        .set_override_option("timeout_secs", overrides.timeout_secs)?
        .build()?
        .try_deserialize()?;

    validate(cfg)
}

fn validate(mut cfg: AppConfig) -> Result<AppConfig, ConfigError> {
    cfg.base_url = parse_base_url(&cfg.base_url)
        .map_err(ConfigError::BaseUrl)?
        .to_string();

    if cfg.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "timeout_secs",
            reason: "must be at least 1 second".to_string(),
        });
    }

    if cfg.listen_addr.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "listen_addr",
            reason: "must not be empty".to_string(),
        });
    }

    Ok(cfg)
}
