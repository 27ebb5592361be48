//! Error types for the alias synchronizer
//!
//! This module defines the closed set of failures a reconciliation pass can
//! end with. None of them are recovered locally: each one aborts the pass and
//! is returned to the caller unchanged.

use thiserror::Error;

/// Result type alias for alias operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the alias synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory configuration field is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Looking up the target name failed
    #[error("Failed to resolve {target}: {message}")]
    Resolution {
        /// The name that was looked up
        target: String,
        /// Resolver error message
        message: String,
    },

    /// An address matched neither the IPv4 nor the IPv6 marker
    #[error("Could not determine record type for {address}")]
    Classification {
        /// The offending address string
        address: String,
    },

    /// A provider list/create/delete call failed
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// HTTP status of the failed call, if the request got that far
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// The pass was aborted through its cancellation token
    #[error("Reconciliation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a classification error
    pub fn classification(address: impl Into<String>) -> Self {
        Self::Classification {
            address: address.into(),
        }
    }

    /// Create a provider error without an HTTP status (transport failures)
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a provider error for a failed HTTP response
    pub fn provider_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether this error came from configuration rather than a run
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
