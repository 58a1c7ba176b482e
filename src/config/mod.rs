use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
}

pub(crate) const APP_DIR: &str = "pagelock";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_SESSION_MINUTES: u32 = 60;
const MIN_SESSION_MINUTES: u32 = 1;
const MAX_SESSION_MINUTES: u32 = 12 * 60;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawAppConfig {
    #[serde(default)]
    session_minutes: Option<u32>,
    #[serde(default)]
    register_autostart: Option<bool>,
    #[serde(default)]
    fullscreen: Option<bool>,
}

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub(crate) session_minutes: u32,
    pub(crate) register_autostart: bool,
    pub(crate) fullscreen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_minutes: DEFAULT_SESSION_MINUTES,
            register_autostart: true,
            fullscreen: true,
        }
    }
}

impl AppConfig {
    pub(crate) fn session_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_minutes))
    }
}

impl From<RawAppConfig> for AppConfig {
    fn from(raw: RawAppConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            session_minutes: raw
                .session_minutes
                .unwrap_or(defaults.session_minutes)
                .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES),
            register_autostart: raw
                .register_autostart
                .unwrap_or(defaults.register_autostart),
            fullscreen: raw.fullscreen.unwrap_or(defaults.fullscreen),
        }
    }
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str::<RawAppConfig>(&contents)
            .map(AppConfig::from)
            .unwrap_or_else(|err| {
                tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
                AppConfig::default()
            }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

pub(crate) fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = non_empty(xdg_config_home) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

/// Environment inputs for the per-OS application data directory.
#[derive(Debug, Clone, Default)]
pub(crate) struct DataDirEnv {
    pub(crate) home: Option<PathBuf>,
    pub(crate) xdg_data_home: Option<PathBuf>,
    pub(crate) app_data: Option<PathBuf>,
}

impl DataDirEnv {
    pub(crate) fn from_env() -> Self {
        Self {
            home: std::env::var_os("HOME").map(PathBuf::from),
            xdg_data_home: std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
            app_data: std::env::var_os("APPDATA").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataDirFlavor {
    Xdg,
    MacOs,
    Windows,
}

impl DataDirFlavor {
    pub(crate) const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Xdg
        }
    }
}

pub(crate) fn app_data_dir(
    app_dir: &str,
    flavor: DataDirFlavor,
    env: &DataDirEnv,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = match flavor {
        DataDirFlavor::Xdg => match non_empty(env.xdg_data_home.as_deref()) {
            Some(xdg) => xdg.to_path_buf(),
            None => env
                .home
                .as_deref()
                .ok_or(ConfigPathError::MissingHomeDirectory)?
                .join(".local")
                .join("share"),
        },
        DataDirFlavor::MacOs => env
            .home
            .as_deref()
            .ok_or(ConfigPathError::MissingHomeDirectory)?
            .join("Library")
            .join("Application Support"),
        DataDirFlavor::Windows => match non_empty(env.app_data.as_deref()) {
            Some(app_data) => app_data.to_path_buf(),
            None => env
                .home
                .as_deref()
                .ok_or(ConfigPathError::MissingHomeDirectory)?
                .join("AppData")
                .join("Roaming"),
        },
    };
    path.push(app_dir);
    Ok(path)
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| !path.as_os_str().is_empty())
}
