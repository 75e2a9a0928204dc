//! Configuration management.
//!
//! Configuration is a plain value passed to components at construction.
//! Nothing here is process-global: two stores in the same process can point
//! at different files with different logging verbosity.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory.
pub const APP_NAME: &str = "people-store";
/// Fixed subdirectory of the application home that holds documents.
pub const DOCUMENTS_DIR: &str = "Documents";
/// Default directory name for the store file.
pub const DEFAULT_DIRECTORY_NAME: &str = "people";
/// Default store file name.
pub const DEFAULT_FILE_NAME: &str = "people.json";

/// Location and diagnostics settings for a single store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Application private area; the store lives under `<app_home>/Documents`.
    pub app_home: PathBuf,
    /// Directory under `Documents` holding the store file.
    pub directory_name: String,
    /// Store file name.
    pub file_name: String,
    /// Emit the full JSON payload at `trace` level on every read and write.
    pub trace_payloads: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            app_home: default_app_home(),
            directory_name: DEFAULT_DIRECTORY_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            trace_payloads: false,
        }
    }
}

impl StoreConfig {
    /// Creates a store configuration rooted at `app_home` with default names.
    #[must_use]
    pub fn new(app_home: impl Into<PathBuf>) -> Self {
        Self {
            app_home: app_home.into(),
            ..Self::default()
        }
    }

    /// Sets the directory name.
    #[must_use]
    pub fn with_directory_name(mut self, name: impl Into<String>) -> Self {
        self.directory_name = name.into();
        self
    }

    /// Sets the file name.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Enables or disables payload tracing.
    #[must_use]
    pub const fn with_trace_payloads(mut self, enabled: bool) -> Self {
        self.trace_payloads = enabled;
        self
    }

    /// Directory that holds the store file.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        self.app_home
            .join(DOCUMENTS_DIR)
            .join(&self.directory_name)
    }

    /// Full path of the store file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.directory().join(&self.file_name)
    }
}

/// Logging settings as read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// `EnvFilter` directive string, e.g. `"people_store=debug"`.
    pub filter: Option<String>,
    /// Optional log file; stderr when absent.
    pub file: Option<PathBuf>,
}

/// Main configuration.
#[derive(Debug, Clone, Default)]
pub struct PeopleStoreConfig {
    /// Store location.
    pub store: StoreConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Store section.
    pub store: Option<ConfigFileStore>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Store section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStore {
    /// Application home.
    pub app_home: Option<String>,
    /// Directory name under `Documents`.
    pub directory_name: Option<String>,
    /// File name.
    pub file_name: Option<String>,
    /// Payload tracing.
    pub trace_payloads: Option<bool>,
}

impl PeopleStoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoFailure`] if the file cannot be read and
    /// [`Error::InvalidInput`] if it is not valid TOML for this schema.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io("read_config_file", e))?;
        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the text is not valid TOML for this schema.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| Error::InvalidInput(format!("config file: {e}")))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<config_dir>/people-store/config.toml`. Falls back to defaults
    /// when the file is missing or unreadable.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let path = base_dirs.config_dir().join(APP_NAME).join("config.toml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring config file"),
            }
        }

        Self::default()
    }

    /// Applies environment variable overrides.
    ///
    /// - `PEOPLE_STORE_HOME`: application home
    /// - `PEOPLE_STORE_DIR`: directory name
    /// - `PEOPLE_STORE_FILE`: file name
    /// - `PEOPLE_STORE_LOG_FORMAT`: "pretty" or "json"
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("PEOPLE_STORE_HOME") {
            if !v.trim().is_empty() {
                self.store.app_home = PathBuf::from(v);
            }
        }
        if let Ok(v) = std::env::var("PEOPLE_STORE_DIR") {
            if !v.trim().is_empty() {
                self.store.directory_name = v;
            }
        }
        if let Ok(v) = std::env::var("PEOPLE_STORE_FILE") {
            if !v.trim().is_empty() {
                self.store.file_name = v;
            }
        }
        if let Ok(v) = std::env::var("PEOPLE_STORE_LOG_FORMAT") {
            self.logging.format = Some(v);
        }
        self
    }

    /// Sets the application home.
    #[must_use]
    pub fn with_app_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.app_home = path.into();
        self
    }

    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(store) = file.store {
            if let Some(app_home) = store.app_home {
                config.store.app_home = PathBuf::from(app_home);
            }
            if let Some(name) = store.directory_name {
                config.store.directory_name = name;
            }
            if let Some(name) = store.file_name {
                config.store.file_name = name;
            }
            if let Some(v) = store.trace_payloads {
                config.store.trace_payloads = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}

/// Platform local data directory joined with the application name.
fn default_app_home() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".").join(APP_NAME),
        |dirs| dirs.data_local_dir().join(APP_NAME),
    )
}
