use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct GeminiConfig {
    /// Usually supplied through `GEMINI_API_KEY` or `config.local.toml`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_body_limit_bytes() -> usize {
    20 * 1024 * 1024
}
fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_initial_backoff() -> String {
    "2s".to_string()
}
fn default_rust_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            max_attempts: default_max_attempts(),
            initial_backoff: default_initial_backoff(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    if let Some(value) = toml_value(&CONFIG, name)
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

fn toml_value(config: &Config, name: &str) -> Option<String> {
    match name {
        "SERVER_BIND_ADDRESS" => Some(config.server.bind_address.clone()),
        "SERVER_BODY_LIMIT_BYTES" => Some(config.server.body_limit_bytes.to_string()),
        "GEMINI_API_KEY" => Some(config.gemini.api_key.clone()),
        "GEMINI_MODEL" => Some(config.gemini.model.clone()),
        "GEMINI_BASE_URL" => Some(config.gemini.base_url.clone()),
        "GEMINI_MAX_ATTEMPTS" => Some(config.gemini.max_attempts.to_string()),
        "GEMINI_INITIAL_BACKOFF" => Some(config.gemini.initial_backoff.clone()),
        "RUST_LOG_FORMAT" => Some(config.logging.rust_log_format.clone()),
        _ => None,
    }
}

/// For tests: override a value at runtime.
#[doc(hidden)]
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

/// For tests: drop a runtime override.
#[doc(hidden)]
pub fn remove(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

/// RAII guard that sets a runtime override and restores the previous
/// value on drop, even when the test panics.
#[doc(hidden)]
pub struct ConfigGuard {
    key: String,
    previous: Option<String>,
}

impl ConfigGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let previous = get_from_store(key);
        set(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => set(&self.key, prev),
            None => remove(&self.key),
        }
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, holds the API key)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Server
    if local.server.bind_address != default_bind_address() {
        base.server.bind_address = local.server.bind_address;
    }
    if local.server.body_limit_bytes != default_body_limit_bytes() {
        base.server.body_limit_bytes = local.server.body_limit_bytes;
    }

    // Gemini
    if !local.gemini.api_key.is_empty() {
        base.gemini.api_key = local.gemini.api_key;
    }
    if local.gemini.model != default_gemini_model() {
        base.gemini.model = local.gemini.model;
    }
    if local.gemini.base_url != default_gemini_base_url() {
        base.gemini.base_url = local.gemini.base_url;
    }
    if local.gemini.max_attempts != default_max_attempts() {
        base.gemini.max_attempts = local.gemini.max_attempts;
    }
    if local.gemini.initial_backoff != default_initial_backoff() {
        base.gemini.initial_backoff = local.gemini.initial_backoff;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}
