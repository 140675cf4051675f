//! CLI configuration management
//!
//! Loads CLI settings from `cli.toml` and merges them with the
//! environment and command-line flags.

use anyhow::{Context, Result};
use openblu_core::{default_config_path, default_credential_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public OpenBlu API
pub const DEFAULT_ENDPOINT: &str = "https://api.intellivoid.info/openblu/v1";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Base URL of the OpenBlu API
    pub endpoint: String,

    /// Default output format
    pub output_format: String,

    /// Enable verbose output by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Where the API key is stored
    pub credential_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_format: "text".to_string(),
            verbose: false,
            timeout: 10,
            credential_path: default_credential_path(),
        }
    }
}

impl CliConfig {
    /// Load configuration from `path`, or defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CLI config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse CLI config file {}", path.display()))
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Sources are applied in that order. A config file only fills values that
/// are still unset; environment variables and explicit setters overwrite.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    endpoint: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    credential_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API endpoint (with validation)
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.endpoint = Some(url);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set the credential file location
    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    /// Load configuration from the default file
    pub fn with_config_file(self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }
        self.with_config_file_at(&default_config_path())
    }

    /// Load configuration from a specific file
    pub fn with_config_file_at(self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(self);
        }

        let config = CliConfig::load_from(path)?;
        Ok(Self {
            endpoint: self.endpoint.or(Some(config.endpoint)),
            output_format: self.output_format.or(Some(config.output_format)),
            verbose: self.verbose.or(Some(config.verbose)),
            timeout: self.timeout.or(Some(config.timeout)),
            credential_path: self.credential_path.or(Some(config.credential_path)),
        })
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("OPENBLU_ENDPOINT") {
            if Self::validate_url(&endpoint).is_ok() {
                self.endpoint = Some(endpoint);
            }
        }

        if let Ok(format) = std::env::var("OPENBLU_FORMAT") {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Ok(verbose) = std::env::var("OPENBLU_VERBOSE") {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var("OPENBLU_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if let Ok(path) = std::env::var("OPENBLU_KEY_FILE") {
            if !path.is_empty() {
                self.credential_path = Some(PathBuf::from(path));
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let endpoint = self.endpoint.unwrap_or(defaults.endpoint);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        Self::validate_url(&endpoint)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            endpoint,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            credential_path: self.credential_path.unwrap_or(defaults.credential_path),
        })
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("API endpoint cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "API endpoint must start with http:// or https://"
            ));
        }

        Ok(())
    }

    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "text" | "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'text', 'table' or 'json'",
                format
            )),
        }
    }

    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
