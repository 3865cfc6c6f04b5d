//! Configuration store: the TOML file holding every subscription and its checkpoint.
//!
//! The file is both input and output of a run. It is loaded once at start,
//! the run works on an in-memory copy, and the whole list is written back once
//! at the end. Both directions are fatal on failure: a run that cannot read its
//! checkpoints must not deliver anything, and a run whose results cannot be
//! saved would redeliver everything next time.
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::subscription::Subscription;
use crate::util::{validate_url, UrlValidationError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Subscription #{index} has an invalid {field}: {source}")]
    InvalidUrl {
        index: usize,
        field: &'static str,
        #[source]
        source: UrlValidationError,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound for fetching one feed (request and body), in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default, alias = "items")]
    pub subscriptions: Vec<Subscription>,
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            subscriptions: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["fetch_timeout_secs", "subscriptions", "items"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or unreadable file → `Err(ConfigError::Io)`
    /// - Invalid TOML or wrong types → `Err(ConfigError::Parse)`
    /// - Non-http(s) source or destination → `Err(ConfigError::InvalidUrl)`
    /// - Empty file → `Ok` with no subscriptions (logged)
    /// - Unknown top-level keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "Config file is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        if config.subscriptions.is_empty() {
            tracing::warn!(path = %path.display(), "Config file has no subscriptions");
        }
        tracing::info!(
            path = %path.display(),
            subscriptions = config.subscriptions.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (index, sub) in self.subscriptions.iter().enumerate() {
            validate_url(&sub.source).map_err(|source| ConfigError::InvalidUrl {
                index,
                field: "source",
                source,
            })?;
            validate_url(&sub.destination).map_err(|source| ConfigError::InvalidUrl {
                index,
                field: "destination",
                source,
            })?;
        }
        Ok(())
    }

    /// Write the whole configuration back to `path`.
    ///
    /// The file is replaced atomically: contents go to a fresh temp file in the
    /// same directory, which is synced and then renamed over the target. The
    /// previous file is left intact if any step fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        atomic_write(path, content.as_bytes())?;
        tracing::info!(
            path = %path.display(),
            subscriptions = self.subscriptions.len(),
            "Saved configuration"
        );
        Ok(())
    }
}

/// Write-to-temp-then-rename so `dst` is never left partially written.
fn atomic_write(dst: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let result = (|| {
        let mut temp_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        temp_file.write_all(content)?;
        temp_file.sync_all()?;
        drop(temp_file);

        // Windows refuses to rename onto an existing file.
        #[cfg(windows)]
        if dst.exists() {
            std::fs::remove_file(dst)?;
        }

        std::fs::rename(&temp_path, dst)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
