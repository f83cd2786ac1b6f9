//! Configuration and credential resolution.
//!
//! Handles:
//! - `.env.local` / `.env` loading at startup
//! - `AppConfig` persisted at `~/.config/script-assist/config.json`
//! - Environment overrides for model and endpoint
//! - API key lookup (env vars first, then the OS keychain)

use crate::capture::MAX_IMAGE_BYTES;
use crate::error::ConfigError;
use crate::llm::prompts::DEFAULT_MODEL;
use crate::session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Env vars checked for the inference credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

const KEYRING_SERVICE: &str = "script-assist";
const KEYRING_USER: &str = "gemini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub model: String,
    pub api_base: String,
    pub max_image_bytes: u64,
    pub request_timeout_secs: u64,
    pub jpeg_quality: u8,
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_image_bytes: MAX_IMAGE_BYTES,
            request_timeout_secs: 60,
            jpeg_quality: 92,
            temperature: 0.1,
        }
    }
}

impl AppConfig {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("script-assist")
            .join("config.json")
    }

    /// Load config from the default path, then apply env overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::default_path());
        config.apply_env_overrides();
        config
    }

    /// Load config from a file. Missing or invalid files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => {
                    log::info!("[SETTINGS] Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("[SETTINGS] Ignoring invalid {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path())
    }

    /// Persist config, creating the directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("[SETTINGS] Saved config to {}", path.display());
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(model) = non_empty_env("SCRIPT_ASSIST_MODEL") {
            log::info!("[SETTINGS] Model override: {}", model);
            self.model = model;
        }
        if let Some(base) = non_empty_env("SCRIPT_ASSIST_API_BASE") {
            log::info!("[SETTINGS] API base override: {}", base);
            self.api_base = base;
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_image_bytes: self.max_image_bytes,
            jpeg_quality: self.jpeg_quality,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load `.env.local` then `.env` from the working directory (first wins).
///
/// Runs before the logger exists, so it reports on stderr.
pub fn load_env_files() {
    for env_file in [".env.local", ".env"] {
        let path = Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break;
        }
    }
}

/// Find the inference API key: env vars first, then the OS keychain.
pub fn resolve_api_key() -> Option<String> {
    if let Some(key) = API_KEY_ENV_VARS.iter().find_map(|k| non_empty_env(k)) {
        return Some(key);
    }

    let entry = keychain_entry().ok()?;
    let key = read_api_key(&entry)?;
    log::info!("[SETTINGS] Loaded API key from OS keychain");
    Some(key)
}

/// Store an API key in the OS keychain.
pub fn save_api_key(api_key: &str) -> Result<(), ConfigError> {
    store_api_key(&keychain_entry()?, api_key)?;
    log::info!("[SETTINGS] API key saved to OS keychain");
    Ok(())
}

fn keychain_entry() -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(|e| ConfigError::Keyring(e.to_string()))
}

fn read_api_key(entry: &keyring::Entry) -> Option<String> {
    entry
        .get_password()
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn store_api_key(entry: &keyring::Entry, api_key: &str) -> Result<(), ConfigError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(ConfigError::EmptyApiKey);
    }
    entry
        .set_password(api_key)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Startup warning when no credential is configured. Never fatal:
/// extraction calls fail at invocation time instead.
pub fn warn_if_missing_api_key(key: Option<&str>) {
    if key.is_none() {
        log::warn!(
            "[STARTUP] GEMINI_API_KEY or GOOGLE_API_KEY is not set. \
             Prescription analysis will not work until a key is provided \
             (add GEMINI_API_KEY=... to .env.local, or run `script-assist set-key`)."
        );
    }
}
