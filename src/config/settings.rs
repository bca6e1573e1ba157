//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! dispatcher once at startup.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::dispatch::DispatchError;

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Connection settings for the generative-AI service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the API endpoint (no trailing slash).
    ///
    /// Default: `https://generativelanguage.googleapis.com`
    pub base_url: String,
    /// API key stored in the settings file.  When `None` (or empty) the key
    /// is read from the environment variable named by `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Seconds to wait for a reply before failing with a timeout.
    /// `None` disables the timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            api_key_env: "API_KEY".into(),
            timeout_secs: Some(120),
        }
    }
}

impl ServiceConfig {
    /// Resolve the API key: settings file first, then the environment.
    ///
    /// Returns [`DispatchError::Configuration`] when neither source yields a
    /// non-empty key.
    pub fn resolve_api_key(&self) -> Result<String, DispatchError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_api_key`](Self::resolve_api_key) with an explicit
    /// environment lookup (useful for tests).
    pub fn resolve_api_key_with<F>(&self, env: F) -> Result<String, DispatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        if let Some(key) = from_file {
            return Ok(key);
        }

        env(&self.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DispatchError::Configuration(format!(
                    "no API key configured; set `service.api_key` or the {} environment variable",
                    self.api_key_env
                ))
            })
    }

    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Model identifiers assigned to the built-in tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Fast multimodal model: transcription, extraction, summaries.
    pub flash: String,
    /// Higher-quality model: correction, translation, drafting.
    pub pro: String,
    /// Image-output model: background removal, outpainting.
    pub image: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            flash: "gemini-2.5-flash".into(),
            pro: "gemini-2.5-pro".into(),
            image: "gemini-2.5-flash-image".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use kurdish_ai_tools::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.service.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service endpoint and credentials.
    pub service: ServiceConfig,
    /// Model names used by the built-in catalogue.
    pub models: ModelConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
