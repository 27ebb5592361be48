// # DNS Provider Trait
//
// Defines the narrow interface the engine uses to read and mutate address
// records at a DNS provider.
//
// ## Implementations
//
// - Cloudflare: `aname-provider-cloudflare` crate
// - Tests: recording in-memory providers
//
// ## Usage
//
// ```rust,ignore
// use aname_core::{DnsProvider, NewRecord, RecordFamily};
//
// let records = provider.list_records(zone, "example.com", RecordFamily::A).await?;
// let created = provider
//     .create_record(zone, &NewRecord::new(RecordFamily::A, "example.com", "192.0.2.1", 60))
//     .await?;
// provider.delete_record(zone, &created.id).await?;
// ```

use async_trait::async_trait;
use std::fmt;

/// Address record family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordFamily {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
}

impl RecordFamily {
    /// Both families, in the order they are listed
    pub const ALL: [RecordFamily; 2] = [RecordFamily::A, RecordFamily::Aaaa];

    /// DNS record type name ("A" or "AAAA")
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFamily::A => "A",
            RecordFamily::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address record owned by the provider
///
/// The engine never mutates one; it only creates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedRecord {
    /// Provider-assigned record identifier
    pub id: String,
    /// Record family
    pub family: RecordFamily,
    /// Record name as reported by the provider
    pub name: String,
    /// Address literal
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

/// Payload of a record creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Record family
    pub family: RecordFamily,
    /// Record name
    pub name: String,
    /// Address literal
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl NewRecord {
    /// Create a new record payload
    pub fn new(
        family: RecordFamily,
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            family,
            name: name.into(),
            content: content.into(),
            ttl,
        }
    }
}

/// Trait for DNS provider implementations
///
/// All calls are scoped to a zone. Implementations perform one logical API
/// operation per call and return errors instead of retrying; a failed pass is
/// retried as a whole by the next invocation.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the records of one family named `name` in `zone`
    ///
    /// Pagination is handled by the implementation; the result is complete.
    async fn list_records(
        &self,
        zone: &str,
        name: &str,
        family: RecordFamily,
    ) -> Result<Vec<ManagedRecord>, crate::Error>;

    /// Create a record in `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(ManagedRecord)`: The record as stored by the provider
    /// - `Err(Error)`: If the creation failed
    async fn create_record(
        &self,
        zone: &str,
        record: &NewRecord,
    ) -> Result<ManagedRecord, crate::Error>;

    /// Delete the record with provider identifier `id` from `zone`
    async fn delete_record(&self, zone: &str, id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
