//! Configuration types for the alias synchronizer
//!
//! The on-disk format is YAML:
//!
//! ```yaml
//! cloudflare:
//!   api-token: "..."
//!   zone-id: "..."
//! record:
//!   name: example.com
//!   target: lb.example.net
//!   ttl: 60
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// TTL applied to created records when none is configured
pub const DEFAULT_TTL: u32 = 60;

/// Main configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    /// Cloudflare account settings
    #[serde(default)]
    pub cloudflare: CloudflareConfig,

    /// The alias record to maintain
    #[serde(default)]
    pub record: RecordConfig,
}

impl AppConfig {
    /// Read and parse a YAML configuration file
    ///
    /// The result is not validated; call [`AppConfig::validate`] before use.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a YAML document
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::config(format!("Invalid YAML: {}", e)))
    }

    /// Replace the API token when an override is present and non-empty
    pub fn with_api_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.cloudflare.api_token = token;
        }
        self
    }

    /// Validate the configuration
    ///
    /// Fails when the API token, zone ID, record name or record target is empty.
    pub fn validate(&self) -> Result<()> {
        if self.cloudflare.api_token.is_empty() {
            return Err(Error::config("cloudflare.api-token is required"));
        }
        if self.cloudflare.zone_id.is_empty() {
            return Err(Error::config("cloudflare.zone-id is required"));
        }
        self.record.validate()
    }

    /// The alias specification handed to the engine
    pub fn alias_spec(&self) -> AliasSpec {
        AliasSpec::new(&self.record.name, &self.record.target, self.record.ttl)
    }
}

/// Cloudflare account settings
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CloudflareConfig {
    /// API token with Zone:DNS:Edit permission
    #[serde(default)]
    pub api_token: String,

    /// Zone the alias record lives in
    #[serde(default)]
    pub zone_id: String,
}

// Keeps the token out of logs
impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

/// Alias record settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordConfig {
    /// Record name to maintain (e.g. the zone apex "example.com")
    #[serde(default)]
    pub name: String,

    /// Hostname whose addresses the record mirrors
    #[serde(default)]
    pub target: String,

    /// TTL for created records; 0 means [`DEFAULT_TTL`]
    #[serde(default)]
    pub ttl: u32,
}

impl RecordConfig {
    /// Validate the record settings
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config("record.name is required"));
        }
        if self.target.is_empty() {
            return Err(Error::config("record.target is required"));
        }
        Ok(())
    }
}

/// The alias being synthesized
///
/// Immutable once built; the engine receives it at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSpec {
    alias_name: String,
    target_name: String,
    ttl: u32,
}

impl AliasSpec {
    /// Create a new alias specification
    ///
    /// A TTL of 0 is replaced with [`DEFAULT_TTL`].
    pub fn new(alias_name: impl Into<String>, target_name: impl Into<String>, ttl: u32) -> Self {
        Self {
            alias_name: alias_name.into(),
            target_name: target_name.into(),
            ttl: if ttl == 0 { DEFAULT_TTL } else { ttl },
        }
    }

    /// Name of the managed A/AAAA records
    pub fn alias_name(&self) -> &str {
        &self.alias_name
    }

    /// Name whose resolution drives the managed set
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// TTL for records created by the engine
    pub fn ttl(&self) -> u32 {
        self.ttl
    }
}
