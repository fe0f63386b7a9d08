use crate::fetch::{DEFAULT_BASE_URL, DocumentSource, HttpSource, PlaceholderSource};
use crate::keybindings::{Keybindings, KeybindingsConfig};
use crate::session::{BACK_TO_TOP_THRESHOLD, DEFAULT_DARK_MODE};
use crate::tui::terminal_compat::ColorMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub terminal: TerminalConfig,

    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Start in dark mode
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,

    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,

    /// Content scroll offset (rows) past which the back-to-top badge appears
    #[serde(default = "default_back_to_top_threshold")]
    pub back_to_top_threshold: u16,
}

/// Where documents are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Serve placeholder documents instead of fetching
    #[serde(default)]
    pub offline: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// "auto", "rgb" or "256"
    #[serde(default = "default_color_mode")]
    pub color_mode: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
            sidebar_width: default_sidebar_width(),
            back_to_top_threshold: default_back_to_top_threshold(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            offline: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            color_mode: default_color_mode(),
        }
    }
}

fn default_dark_mode() -> bool {
    DEFAULT_DARK_MODE
}

fn default_sidebar_width() -> u16 {
    32
}

fn default_back_to_top_threshold() -> u16 {
    BACK_TO_TOP_THRESHOLD
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_color_mode() -> String {
    "auto".to_string()
}

/// Errors reading an explicitly requested config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Get the XDG-style config file path (~/.config/studydash/config.toml)
    /// This is preferred on macOS for CLI tools and cross-platform dotfiles
    #[cfg(target_os = "macos")]
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("studydash").join("config.toml"))
    }

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/studydash/config.toml
    /// - Linux: ~/.config/studydash/config.toml
    /// - Windows: %APPDATA%/studydash/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studydash").join("config.toml"))
    }

    /// Load config from the default location, or return defaults.
    ///
    /// A missing file is not an error. A file that fails to parse is logged
    /// and ignored.
    pub fn load() -> Self {
        #[cfg(target_os = "macos")]
        {
            // Prefer XDG-style path on macOS for CLI tools
            if let Some(xdg_path) = Self::xdg_config_path() {
                if xdg_path.exists() {
                    return Self::load_or_default(&xdg_path);
                }
            }
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::load_or_default(&path),
            _ => Self::default(),
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from TOML text
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Color mode forced by config, `None` for auto-detection
    pub fn color_mode(&self) -> Option<ColorMode> {
        ColorMode::from_config(&self.terminal.color_mode)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs.max(1))
    }

    /// The document source these settings select
    pub fn document_source(&self) -> Result<Arc<dyn DocumentSource>, reqwest::Error> {
        if self.source.offline {
            return Ok(Arc::new(PlaceholderSource));
        }
        let source = HttpSource::new(self.source.base_url.clone(), self.timeout())?;
        Ok(Arc::new(source))
    }

    /// Get keybindings with user customizations applied
    pub fn keybindings(&self) -> Keybindings {
        Keybindings::with_overrides(&self.keybindings)
    }
}
