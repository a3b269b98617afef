//! Persistent configuration store.
//!
//! Settings live in a flat TOML table at `<config_dir>/gpush/config.toml`.
//! Defaults are applied when a key is read, never written back, so a
//! fresh install has no file at all until the first `set`.

pub mod env;
pub mod keys;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ConfigError;
use crate::llm::Provider;

pub use keys::{ConfigKey, mask_secret, validate_api_key};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "gpush";

/// Configuration object constructed once at startup and passed down by reference.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File backing this config. `None` keeps all changes in memory.
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// Honors `GPUSH_CONFIG_DIR`, otherwise uses the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path()?)
    }

    /// Load the configuration from a specific file. A missing file is an empty config.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&content).map_err(ConfigError::ParseFailed)?
        } else {
            BTreeMap::new()
        };

        debug!(
            "Loaded configuration from {} ({} keys)",
            path.display(),
            values.len()
        );

        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// A configuration that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored value for `key`, or its documented default.
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        self.values
            .get(key.as_str())
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| key.default_value().map(String::from))
    }

    /// Whether a value has been explicitly stored for `key`.
    pub fn is_set(&self, key: ConfigKey) -> bool {
        self.values.get(key.as_str()).is_some_and(|v| !v.is_empty())
    }

    /// Store a value and persist the file.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<(), ConfigError> {
        self.values.insert(key.as_str().to_string(), value.into());
        if key.is_secret() {
            debug!("Updated {}", key);
        } else {
            debug!("Updated {} = {}", key, self.values[key.as_str()]);
        }
        self.save()
    }

    /// Remove a stored value so reads fall back to the default.
    pub fn unset(&mut self, key: ConfigKey) -> Result<(), ConfigError> {
        if self.values.remove(key.as_str()).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// The selected provider. Fails on an unrecognized identifier.
    pub fn provider(&self) -> Result<Provider, ConfigError> {
        let raw = self
            .get(ConfigKey::Provider)
            .unwrap_or_else(|| keys::DEFAULT_PROVIDER.to_string());
        raw.parse()
    }

    pub fn openai_model(&self) -> String {
        self.get_or_default(ConfigKey::OpenAiModel)
    }

    pub fn bedrock_model(&self) -> String {
        self.get_or_default(ConfigKey::BedrockModel)
    }

    pub fn aws_region(&self) -> String {
        self.get_or_default(ConfigKey::AwsRegion)
    }

    /// Model for the given provider.
    pub fn model_for(&self, provider: Provider) -> String {
        match provider {
            Provider::OpenAi => self.openai_model(),
            Provider::Bedrock => self.bedrock_model(),
        }
    }

    /// The OpenAI API key. Required whenever the OpenAI provider is used.
    pub fn openai_api_key(&self) -> Result<String, ConfigError> {
        self.get(ConfigKey::OpenAiApiKey)
            .ok_or(ConfigError::MissingCredential {
                label: "API key",
                hint: "Use `gpush config --set-key <key>`",
            })
    }

    /// The Bedrock API key, falling back to `AWS_BEARER_TOKEN_BEDROCK`.
    pub fn bedrock_api_key(&self) -> Result<String, ConfigError> {
        self.get(ConfigKey::BedrockApiKey)
            .or_else(|| env::non_empty(env::BEDROCK_TOKEN_ENV_VAR))
            .ok_or(ConfigError::MissingCredential {
                label: "Bedrock API key",
                hint: "Use `gpush config --set-bedrock-key <key>` or set AWS_BEARER_TOKEN_BEDROCK",
            })
    }

    /// Diff cap in characters.
    pub fn max_diff_length(&self) -> usize {
        env::max_diff_length()
    }

    /// Timeout for one provider request.
    pub fn request_timeout(&self) -> Duration {
        env::request_timeout()
    }

    fn get_or_default(&self, key: ConfigKey) -> String {
        self.get(key)
            .or_else(|| key.default_value().map(String::from))
            .unwrap_or_default()
    }

    /// Write the configuration atomically. In-memory configs are a no-op.
    fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let write_err = |source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(dir).map_err(write_err)?;

        let content = toml::to_string(&self.values).map_err(ConfigError::SerializeFailed)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        restrict_permissions(tmp.path()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Resolve `<config_dir>/gpush/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = match env::config_dir_override() {
        Some(dir) => dir,
        None => dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(APP_DIR_NAME),
    };
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Credentials are stored in this file, so keep it owner-only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
