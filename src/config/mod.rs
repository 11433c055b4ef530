//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the backend endpoint, the public API key, theme preference, and
//! the persisted session used for restoration on the next start.

mod error;

pub use error::ConfigError;

use crate::backend::Session;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/meals-tui";

pub const BACKEND_URL_VAR: &str = "SUPABASE_URL";
pub const API_KEY_VAR: &str = "SUPABASE_API_KEY";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
pub const DEFAULT_API_KEY: &str = "public-anon-key";

/// Oversees management of configuration file.
///
#[derive(Clone)]
pub struct Config {
    pub backend_url: String,
    pub api_key: String,
    pub theme_name: String,
    pub session: Option<Session>,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Default, Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

fn default_theme_name() -> String {
    "default".to_string()
}

impl Config {
    /// Return a new instance with baked-in defaults.
    ///
    pub fn new() -> Config {
        Config {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            theme_name: default_theme_name(),
            session: None,
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// path if provided, then apply environment overrides. A missing file is
    /// not an error; it is written on the first save.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            if let Some(backend_url) = data.backend_url {
                self.backend_url = backend_url;
            }
            if let Some(api_key) = data.api_key {
                self.api_key = api_key;
            }
            self.theme_name = data.theme_name;
            self.session = data.session;
        }

        self.apply_env(|name| std::env::var(name).ok());
        Ok(())
    }

    /// Override the endpoint and key with non-empty values from the lookup.
    ///
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) -> &mut Self {
        if let Some(url) = lookup(BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
        if let Some(key) = lookup(API_KEY_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// Serialize the configuration data and write it to the disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            backend_url: self.file_override(&self.backend_url, DEFAULT_BACKEND_URL),
            api_key: self.file_override(&self.api_key, DEFAULT_API_KEY),
            theme_name: self.theme_name.clone(),
            session: self.session.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = open_private(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Persist the session (or its absence) to the config file.
    ///
    pub fn save_session(&mut self, session: Option<Session>) -> Result<(), AppError> {
        self.session = session;
        self.save()
    }

    /// Returns the value to write to the file, omitting defaults and values
    /// that came from the environment.
    ///
    fn file_override(&self, value: &str, default: &str) -> Option<String> {
        let from_env = [BACKEND_URL_VAR, API_KEY_VAR]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .any(|v| v == value);
        if value == default || from_env {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

/// Open the file for writing, truncated. The file holds session tokens, so on
/// unix it is readable by the owner only, including when it already existed.
///
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use std::collections::HashMap;

    #[test]
    fn new_uses_defaults() {
        let config = Config::new();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.theme_name, "default");
        assert!(config.session.is_none());
    }

    #[test]
    fn apply_env_overrides_non_empty_values() {
        let env: HashMap<&str, &str> = [
            (BACKEND_URL_VAR, "https://project.supabase.co"),
            (API_KEY_VAR, "  "),
        ]
        .into_iter()
        .collect();
        let mut config = Config::new();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.backend_url, "https://project.supabase.co");
        assert_eq!(config.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn load_without_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested");
        let mut config = Config::new();
        config.load(path.to_str()).unwrap();
        assert!(path.exists());
        assert!(config.session.is_none());
        assert_eq!(config.theme_name, "default");
    }

    #[test]
    fn save_session_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        config.theme_name = "dark".to_string();
        let session: Session = Faker.fake();
        config.save_session(Some(session.clone())).unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.path().to_str()).unwrap();
        assert_eq!(reloaded.session, Some(session));
        assert_eq!(reloaded.theme_name, "dark");

        reloaded.save_session(None).unwrap();
        let contents = fs::read_to_string(dir.path().join(FILE_NAME)).unwrap();
        assert!(!contents.contains("session"));
    }

    #[test]
    fn save_without_load_fails() {
        let config = Config::new();
        assert!(matches!(
            config.save(),
            Err(AppError::Config(ConfigError::FilePathNotSet))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        config.save().unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o600);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let session: Session = Faker.fake();
        config.save_session(Some(session)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
