//! TOML configuration with environment overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding `[session] access_token`.
pub const ENV_ACCESS_TOKEN: &str = "STUDYBOARD_ACCESS_TOKEN";
/// Environment variable overriding `[session] role`.
pub const ENV_ROLE: &str = "STUDYBOARD_ROLE";
/// Environment variable overriding `[api] base_url`.
pub const ENV_API_URL: &str = "STUDYBOARD_API_URL";

/// Errors that can occur while locating or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The platform does not provide a config directory.
    #[error("could not determine XDG config directory")]
    NoConfigDir,

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub access: AccessConfig,
}

/// Backend REST API location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Object storage endpoints and keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Multipart upload endpoint.
    pub upload_url: String,
    /// REST API root used to commit and delete uploads.
    pub api_url: String,
    /// CDN root that serves committed files.
    pub cdn_url: String,
    pub public_key: String,
    pub secret_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_url: "https://upload.uploadcare.com/base/".to_string(),
            api_url: "https://api.uploadcare.com".to_string(),
            cdn_url: "https://ucarecdn.com".to_string(),
            public_key: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Credentials of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub access_token: Option<String>,
    pub role: Option<String>,
}

/// Who may open new studies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Roles allowed on the open-study page. Compared case-insensitively.
    pub authorized_roles: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            authorized_roles: vec!["ADMIN".to_string(), "MANAGER".to_string()],
        }
    }
}

impl Config {
    /// Returns `$XDG_CONFIG_HOME/studyboard/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("studyboard").join("config.toml"))
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    ///
    /// Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.session.access_token = Some(token);
        }
        if let Some(role) = get(ENV_ROLE) {
            self.session.role = Some(role);
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        self
    }
}

/// Returns the directory for the log file, creating it if needed.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::data_dir()
        .ok_or(ConfigError::NoDataDir)?
        .join("studyboard");
    fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.access.authorized_roles, vec!["ADMIN", "MANAGER"]);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[api]
base_url = "https://study.example"

[session]
access_token = "tok"
role = "ADMIN"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://study.example");
        assert_eq!(config.session.access_token.as_deref(), Some("tok"));
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 3").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn directory_path_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn overrides_replace_session_and_api() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_ACCESS_TOKEN, "env-token"),
            (ENV_ROLE, "MANAGER"),
            (ENV_API_URL, "http://127.0.0.1:9000"),
        ]);
        let config =
            Config::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.session.access_token.as_deref(), Some("env-token"));
        assert_eq!(config.session.role.as_deref(), Some("MANAGER"));
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn empty_override_is_ignored() {
        let mut config = Config::default();
        config.session.access_token = Some("file-token".into());
        let config = config.with_overrides(|key| (key == ENV_ACCESS_TOKEN).then(String::new));
        assert_eq!(config.session.access_token.as_deref(), Some("file-token"));
    }
}
