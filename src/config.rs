//! Configuration for the action dispatcher
//!
//! Handles configuration loading from environment variables and defaults.

use crate::error::{ActionError, Result};

// =============================================================================
// Constants
// =============================================================================

/// Default search engine prefix used by `SearchSelection`
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Environment variable for a custom search engine prefix
pub const ENV_SEARCH_URL: &str = "GESTURE_ACTIONS_SEARCH_URL";

/// Environment variable toggling per-target serialization of toggle commands
pub const ENV_SERIALIZE_TOGGLES: &str = "GESTURE_ACTIONS_SERIALIZE_TOGGLES";

// =============================================================================
// Config Struct
// =============================================================================

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prefix the URL-encoded selection is appended to
    pub search_url: String,

    /// Queue toggle commands per target so query-then-act pairs never interleave
    pub serialize_toggles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            serialize_toggles: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(search_url) = lookup(ENV_SEARCH_URL) {
            config.search_url = parse_search_url(&search_url)?;
        }

        if let Some(flag) = lookup(ENV_SERIALIZE_TOGGLES) {
            config.serialize_toggles = parse_flag(ENV_SERIALIZE_TOGGLES, &flag)?;
        }

        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Load the global dispatcher configuration
pub fn load_config() -> Result<Config> {
    Config::from_env()
}

fn parse_search_url(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ActionError::InvalidArguments(format!(
            "{} must be an http(s) URL, got {:?}",
            ENV_SEARCH_URL, value
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ActionError::InvalidArguments(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================
