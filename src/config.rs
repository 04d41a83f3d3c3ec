//! Uploader configuration
//!
//! Configuration is captured once when the [`crate::Uploader`] is built and
//! is immutable afterwards; only the default upload options (see
//! [`crate::UploadOptions`]) can be changed on a live instance.

use crate::error::{Result, UploaderError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of retries after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-attempt timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum accepted file size (10 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for an [`crate::Uploader`] instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Accepted file extensions, lowercase and without the leading dot.
    /// Empty means accept everything.
    #[serde(rename = "accept", skip_serializing_if = "Vec::is_empty", default)]
    pub accept: Vec<String>,

    /// Whether a single selection may yield more than one file (default: false)
    #[serde(rename = "multiple", default)]
    pub multiple: bool,

    /// Retries after the first failed attempt (default: 3)
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-attempt timeout in seconds (default: 30)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum accepted file size in bytes (default: 10 MiB).
    /// `None` disables the size check.
    #[serde(rename = "max-size", skip_serializing_if = "Option::is_none", default)]
    pub max_size: Option<u64>,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            accept: vec![],
            multiple: false,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_size: Some(DEFAULT_MAX_SIZE),
        }
    }
}

impl UploaderConfig {
    /// Create a configuration with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict selection to the given file extensions
    pub fn accept<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Allow more than one file per selection
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the number of retries after the first failed attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Set the maximum accepted file size in bytes
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Disable the file size check entirely
    pub fn unlimited_size(mut self) -> Self {
        self.max_size = None;
        self
    }

    /// The per-attempt timeout as a [`Duration`]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a file of the given size passes the size check
    pub fn fits_size_limit(&self, size: u64) -> bool {
        match self.max_size {
            Some(max) => size <= max,
            None => true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(UploaderError::invalid_parameter(
                "timeout-secs",
                "Timeout must be greater than 0",
            ));
        }

        if let Some(0) = self.max_size {
            return Err(UploaderError::invalid_parameter(
                "max-size",
                "Maximum file size must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Convert the configuration to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| UploaderError::config(e.to_string()))
    }

    /// Create a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| UploaderError::config(e.to_string()))
    }
}
