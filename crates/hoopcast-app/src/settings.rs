// Process-wide settings: where partitions live, where output goes, and
// which scoring format and overrides to apply.
//
// Resolution order for each path: environment variable, then
// config/hoopcast.toml, then the built-in default under the base directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use hoopcast_core::config::DEFAULT_LEAGUE_TOML;

pub const DATA_DIR_ENV: &str = "HOOPCAST_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "HOOPCAST_OUTPUT_DIR";
pub const OVERRIDES_ENV: &str = "HOOPCAST_OVERRIDES";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsWriteError { message: String },
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory scanned for partition CSV files.
    pub data_dir: PathBuf,
    /// Directory receiving one sub-directory of CSV tables per partition.
    pub output_dir: PathBuf,
    pub db_path: String,
    pub league_path: PathBuf,
    /// Optional JSON overrides document from the configuration source.
    pub overrides_path: Option<PathBuf>,
}

/// config/hoopcast.toml. Relative paths resolve against the base directory.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    db_path: Option<String>,
    #[serde(default)]
    league: Option<PathBuf>,
    #[serde(default)]
    overrides: Option<PathBuf>,
}

impl Settings {
    /// Built-in layout under `base_dir`.
    pub fn defaults(base_dir: &Path) -> Self {
        Settings {
            data_dir: base_dir.join("data"),
            output_dir: base_dir.join("output"),
            db_path: base_dir.join("hoopcast.db").display().to_string(),
            league_path: base_dir.join("config").join("league.toml"),
            overrides_path: None,
        }
    }
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// Load settings for `base_dir`, reading environment variables through `env`.
pub fn load_settings_from<F>(base_dir: &Path, env: F) -> Result<Settings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = base_dir.join("config").join("hoopcast.toml");
    let file: SettingsFile = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|e| SettingsError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| SettingsError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        SettingsFile::default()
    };

    let mut settings = Settings::defaults(base_dir);
    if let Some(dir) = file.data_dir {
        settings.data_dir = resolve(base_dir, dir);
    }
    if let Some(dir) = file.output_dir {
        settings.output_dir = resolve(base_dir, dir);
    }
    if let Some(db_path) = file.db_path {
        settings.db_path = db_path;
    }
    if let Some(league) = file.league {
        settings.league_path = resolve(base_dir, league);
    }
    settings.overrides_path = file.overrides.map(|p| resolve(base_dir, p));

    let from_env = |name: &str| env(name).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
    if let Some(dir) = from_env(DATA_DIR_ENV) {
        settings.data_dir = dir;
    }
    if let Some(dir) = from_env(OUTPUT_DIR_ENV) {
        settings.output_dir = dir;
    }
    if let Some(path) = from_env(OVERRIDES_ENV) {
        settings.overrides_path = Some(path);
    }

    Ok(settings)
}

/// Load settings for the current working directory and process environment.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let cwd = std::env::current_dir().map_err(|e| SettingsError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_settings_from(&cwd, |name| std::env::var(name).ok())
}

/// Write the bundled scoring format to `league_path` if nothing is there yet.
///
/// Returns `true` when the file was created.
pub fn ensure_league_file(league_path: &Path) -> Result<bool, SettingsError> {
    if league_path.exists() {
        return Ok(false);
    }
    if let Some(parent) = league_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::DefaultsWriteError {
            message: format!("failed to create config directory: {e}"),
        })?;
    }
    std::fs::write(league_path, DEFAULT_LEAGUE_TOML).map_err(|e| {
        SettingsError::DefaultsWriteError {
            message: format!("failed to write {}: {e}", league_path.display()),
        }
    })?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
