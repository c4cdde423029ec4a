//! Cross-platform configuration paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\korthai\
//!   macOS:   ~/Library/Application Support/korthai/
//!   Linux:   ~/.config/korthai/
//!
//! `KORTHAI_CONFIG` overrides the settings file location entirely.

use std::path::PathBuf;

/// Environment variable naming an explicit `settings.toml` path.
pub const CONFIG_PATH_ENV: &str = "KORTHAI_CONFIG";

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "korthai";

    /// Resolves paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (containers without a home directory, for instance).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
        }
    }

    /// Like [`AppPaths::new`], but honours an explicit settings path taken
    /// from `lookup(CONFIG_PATH_ENV)`.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                let settings_file = PathBuf::from(path);
                let config_dir = settings_file
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                Self {
                    config_dir,
                    settings_file,
                }
            }
            None => Self::new(),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
