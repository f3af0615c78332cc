use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub api_path: String,
    pub cookie_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "https://ec-course-api.hexschool.io/v2".into(),
            api_path: String::new(),
            cookie_path: None,
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
    api_path: Option<String>,
    cookie_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Flags given on the command line; each one wins over file and env.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub api_path: Option<String>,
    pub cookie_path: Option<PathBuf>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured cookie file, or `<data-local-dir>/catalog_console/session.cookie`.
    pub fn resolved_cookie_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.cookie_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_local_dir()
            .context("no local data directory; set APP__COOKIE_PATH or --cookie")?;
        Ok(data_dir.join("catalog_console").join("session.cookie"))
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.api_base {
            self.api_base = v;
        }
        if let Some(v) = overrides.api_path {
            self.api_path = v;
        }
        if let Some(v) = overrides.cookie_path {
            self.cookie_path = Some(v);
        }
    }
}

/// Defaults, then the config file (`console.toml` unless `config_path` is
/// given), then process environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match config_path {
        Some(path) => Some(read_file_settings(path)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(read_file_settings(default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.api_base {
            settings.api_base = v;
        }
        if let Some(v) = file_cfg.api_path {
            settings.api_path = v;
        }
        if let Some(v) = file_cfg.cookie_path {
            settings.cookie_path = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = env("API_PATH") {
        settings.api_path = v;
    }
    if let Some(v) = env("APP__API_PATH") {
        settings.api_path = v;
    }

    if let Some(v) = env("APP__COOKIE_PATH") {
        settings.cookie_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}
