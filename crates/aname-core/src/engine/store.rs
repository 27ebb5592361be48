//! Managed record retrieval

use crate::error::Result;
use crate::traits::{DnsProvider, ManagedRecord, RecordFamily};
use tracing::debug;

/// Read-only view of the records the engine manages in one zone
pub struct RecordStore<'a> {
    provider: &'a dyn DnsProvider,
    zone: &'a str,
}

impl<'a> RecordStore<'a> {
    /// Create a store over `zone`
    pub fn new(provider: &'a dyn DnsProvider, zone: &'a str) -> Self {
        Self { provider, zone }
    }

    /// Fetch every A and AAAA record named `alias_name`
    ///
    /// Issues one A query and one AAAA query and concatenates the results.
    /// The first failing query aborts; nothing is retried.
    pub async fn fetch_managed(&self, alias_name: &str) -> Result<Vec<ManagedRecord>> {
        let mut records = Vec::new();
        for family in RecordFamily::ALL {
            let mut batch = self
                .provider
                .list_records(self.zone, alias_name, family)
                .await?;
            debug!("Found {} {} record(s) for {}", batch.len(), family, alias_name);
            records.append(&mut batch);
        }
        Ok(records)
    }
}
