//! System hostname resolution
//!
//! [`SystemResolver`] asks the host's resolver (getaddrinfo through tokio)
//! for every address of the target name.

use crate::error::{Error, Result};
use crate::traits::AddressResolver;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::net::IpAddr;
use tracing::debug;

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new system resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AddressResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<BTreeSet<String>> {
        debug!("Looking up {}", host);

        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| Error::resolution(host, e.to_string()))?;

        let resolved = collect_addresses(host, addrs.map(|addr| addr.ip()))?;
        debug!("{} resolved to {:?}", host, resolved);
        Ok(resolved)
    }
}

/// Canonicalize lookup results into a set
///
/// An empty answer is an error: reconciling against it would delete every
/// managed record.
fn collect_addresses(
    host: &str,
    addrs: impl IntoIterator<Item = IpAddr>,
) -> Result<BTreeSet<String>> {
    let resolved: BTreeSet<String> = addrs.into_iter().map(|ip| ip.to_string()).collect();
    if resolved.is_empty() {
        return Err(Error::resolution(host, "no addresses returned"));
    }
    Ok(resolved)
}
