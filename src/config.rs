use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "svnchangelog";
const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_SVN_BINARY: &str = "svn";
const DEFAULT_TRUSTED_USERS_URL: &str = "https://archlinux.org/people/trusted-users/";
const DEFAULT_DEVELOPERS_URL: &str = "https://archlinux.org/people/developers/";
const DEFAULT_PACKAGES_URL: &str = "https://archlinux.org/packages/";
const DEFAULT_FELLOWS_URL: &str = "https://archlinux.org/people/developer-fellows/";

const ENV_CONFIG: &str = "SVNCHANGELOG_CONFIG";
const ENV_SVN: &str = "SVNCHANGELOG_SVN";
const ENV_TRUSTED_USERS_URL: &str = "SVNCHANGELOG_TRUSTED_USERS_URL";
const ENV_DEVELOPERS_URL: &str = "SVNCHANGELOG_DEVELOPERS_URL";
const ENV_PACKAGES_URL: &str = "SVNCHANGELOG_PACKAGES_URL";
const ENV_FELLOWS_URL: &str = "SVNCHANGELOG_FELLOWS_URL";
const ENV_HTTP_TIMEOUT: &str = "SVNCHANGELOG_HTTP_TIMEOUT";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub svn_binary: String,
    pub directories: DirectoryUrls,
    pub http_timeout: Option<Duration>,
    pub workspace_root: PathBuf,
}

/// Where the people directories live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUrls {
    pub trusted_users: String,
    pub developers: String,
    pub packages: String,
    pub fellows: String,
}

impl Default for DirectoryUrls {
    fn default() -> Self {
        Self {
            trusted_users: DEFAULT_TRUSTED_USERS_URL.to_string(),
            developers: DEFAULT_DEVELOPERS_URL.to_string(),
            packages: DEFAULT_PACKAGES_URL.to_string(),
            fellows: DEFAULT_FELLOWS_URL.to_string(),
        }
    }
}

/// On-disk overrides, all optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoredConfig {
    pub svn_binary: Option<String>,
    pub trusted_users_url: Option<String>,
    pub developers_url: Option<String>,
    pub packages_url: Option<String>,
    pub fellows_url: Option<String>,
    pub http_timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = match config_file_path() {
            Some(path) => StoredConfig::load_from(&path)?,
            None => StoredConfig::default(),
        };
        Self::from_layers(workspace_hint, stored, |key| env::var(key).ok())
    }

    /// Defaults, then the stored file, then the environment.
    pub fn from_layers(
        workspace_hint: &Path,
        stored: StoredConfig,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let defaults = DirectoryUrls::default();
        let layered = |key: &str, stored: Option<String>, default: String| {
            lookup_env(key)
                .filter(|value| !value.trim().is_empty())
                .or(stored)
                .unwrap_or(default)
        };

        let directories = DirectoryUrls {
            trusted_users: layered(
                ENV_TRUSTED_USERS_URL,
                stored.trusted_users_url,
                defaults.trusted_users,
            ),
            developers: layered(ENV_DEVELOPERS_URL, stored.developers_url, defaults.developers),
            packages: layered(ENV_PACKAGES_URL, stored.packages_url, defaults.packages),
            fellows: layered(ENV_FELLOWS_URL, stored.fellows_url, defaults.fellows),
        };

        let svn_binary = layered(
            ENV_SVN,
            stored.svn_binary,
            DEFAULT_SVN_BINARY.to_string(),
        );

        let timeout_secs = match lookup_env(ENV_HTTP_TIMEOUT) {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                AppError::Configuration(format!(
                    "{ENV_HTTP_TIMEOUT} must be a whole number of seconds, got '{value}'"
                ))
            })?),
            None => stored.http_timeout_secs,
        };
        let http_timeout = match timeout_secs {
            Some(0) => {
                return Err(AppError::Configuration(
                    "HTTP timeout must be at least one second".to_string(),
                ));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            svn_binary,
            directories,
            http_timeout,
            workspace_root: workspace_hint.to_path_buf(),
        })
    }
}
