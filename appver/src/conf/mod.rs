use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "src/conf/"]
#[include = "*.toml"]
struct EmbeddedConfigFS;

const DEFAULT_CONFIG_FILE: &str = "default_config.toml";

/// Environment variables with this prefix override file values; sections are separated by
/// a double underscore, e.g. `APPVER_DISPLAY__PAGE_SIZE=10`.
const ENV_PREFIX: &str = "APPVER_";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("embedded default configuration is missing or not valid utf-8")]
    MissingDefaults,

    #[error("could not parse configuration; {0}")]
    Parse(#[from] Box<figment::Error>),

    #[error("display.page_size must be at least 1")]
    InvalidPageSize,

    #[error("configuration file '{0}' does not exist")]
    MissingFile(PathBuf),
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub general: General,
    pub display: DisplaySettings,
    pub history: History,
    pub rollback: Rollback,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct General {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub page_size: usize,
    pub utc: bool,
    pub hints: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    /// The version history document to read when none is passed on the command line.
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Rollback {
    pub request_path: Option<PathBuf>,
}

/// The default paths searched when the user does not give one.
fn config_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return vec![];
    };

    vec![home.join(".appver.toml"), home.join(".config/appver.toml")]
}

impl Config {
    /// Reads the configuration from the embedded defaults, then the user's config file(s), then
    /// the environment. Later sources override earlier ones.
    ///
    /// The default search paths are optional, but an explicitly given path must exist.
    pub fn load(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let paths = match path_override {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()))
            }
            Some(path) => vec![path.to_path_buf()],
            None => config_paths(),
        };

        Self::load_from(&paths)
    }

    /// Like [`Config::load`] but with an explicit list of files; missing files are skipped.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let default_config_raw =
            EmbeddedConfigFS::get(DEFAULT_CONFIG_FILE).ok_or(ConfigError::MissingDefaults)?;
        let default_config = std::str::from_utf8(&default_config_raw.data)
            .map_err(|_| ConfigError::MissingDefaults)?;

        let mut figment = Figment::new().merge(Toml::string(default_config));

        for path in paths {
            figment = figment.merge(Toml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        if config.display.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(config)
    }
}
