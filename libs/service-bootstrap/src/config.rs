//! Layered application configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. YAML file (`--config`)
//! 3. environment variables prefixed `APP__`, `__` separating nested keys
//! 4. CLI overrides
//!
//! Module sections stay raw JSON until the owning module reads them with
//! [`AppConfig::module_config`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "APP__";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration for module '{module}': {source}")]
    Module {
        module: String,
        source: serde_json::Error,
    },

    #[error("failed to render configuration: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "translation-server".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Per-module sections, keyed by module name.
    pub modules: BTreeMap<String, serde_json::Value>,
}

/// Command-line values that override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub print_config: bool,
    /// `-v` count: 1 info, 2 debug, 3 or more trace.
    pub verbose: u8,
}

impl AppConfig {
    /// Load defaults, the optional YAML file and `APP__*` environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingFile`] if `path` is given but absent, or
    /// [`ConfigError::Load`] if a source cannot be parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layered(path, Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn load_layered(path: Option<&Path>, env: Env) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment
            .merge(env)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let level = match args.verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Deserialize the section of `module`, falling back to `T::default()` when absent.
    ///
    /// # Errors
    /// Returns [`ConfigError::Module`] if the section does not match `T`.
    pub fn module_config<T>(&self, module: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module) {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(raw) => {
                serde_json::from_value(raw.clone()).map_err(|source| ConfigError::Module {
                    module: module.to_owned(),
                    source,
                })
            }
        }
    }

    /// Replace the section of `module` with its effective value.
    ///
    /// # Errors
    /// Returns [`ConfigError::Module`] if `value` cannot be represented as JSON.
    pub fn set_module_config<T: Serialize>(
        &mut self,
        module: &str,
        value: &T,
    ) -> Result<(), ConfigError> {
        let raw = serde_json::to_value(value).map_err(|source| ConfigError::Module {
            module: module.to_owned(),
            source,
        })?;
        self.modules.insert(module.to_owned(), raw);
        Ok(())
    }

    /// # Errors
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}
