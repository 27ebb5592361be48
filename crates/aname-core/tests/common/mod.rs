//! Test doubles and common utilities for engine contract tests
//!
//! The provider double keeps records in memory and logs every call so tests
//! can assert on ordering and on which calls were never attempted.

use aname_core::error::{Error, Result};
use aname_core::traits::{AddressResolver, DnsProvider, ManagedRecord, NewRecord, RecordFamily};
use aname_core::{AliasEngine, AliasSpec, CancellationToken};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ZONE: &str = "test-zone";
pub const ALIAS: &str = "example.com";
pub const TARGET: &str = "lb.example.net";

/// A resolver returning a fixed answer
pub struct ScriptedResolver {
    answer: Result<BTreeSet<String>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new(addresses: &[&str]) -> Self {
        Self {
            answer: Ok(addresses.iter().map(|s| s.to_string()).collect()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(Error::resolution(TARGET, "no such host")),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared lookup counter, usable after the resolver is boxed
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl AddressResolver for ScriptedResolver {
    async fn resolve(&self, host: &str) -> Result<BTreeSet<String>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        assert_eq!(host, TARGET);
        match &self.answer {
            Ok(set) => Ok(set.clone()),
            Err(_) => Err(Error::resolution(host, "no such host")),
        }
    }
}

/// A provider call, as observed by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(RecordFamily),
    Create(String),
    Delete(String),
}

/// How the mock should misbehave
#[derive(Clone, Default)]
enum Fault {
    #[default]
    None,
    /// Fail the n-th (1-based) create
    FailCreate(usize),
    /// Fail the n-th (1-based) delete
    FailDelete(usize),
    /// Fail listing of this family
    FailList(RecordFamily),
    /// Cancel the token during the n-th create and never answer
    CancelDuringCreate(usize, CancellationToken),
}

#[derive(Default)]
struct Inner {
    records: Vec<ManagedRecord>,
    calls: Vec<Call>,
    next_id: usize,
    creates: usize,
    deletes: usize,
    fault: Fault,
}

/// An in-memory DnsProvider that records calls
///
/// Clones share state, so a test can keep a handle after boxing one into
/// the engine.
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    inner: Arc<Mutex<Inner>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed managed records; ids are "seed-<content>"
    pub fn with_records(addresses: &[&str]) -> Self {
        let provider = Self::new();
        {
            let mut inner = provider.inner.lock().unwrap();
            for address in addresses {
                inner.records.push(ManagedRecord {
                    id: format!("seed-{address}"),
                    family: aname_core::classify(address).unwrap(),
                    name: ALIAS.to_string(),
                    content: address.to_string(),
                    ttl: 60,
                });
            }
        }
        provider
    }

    /// Seed a raw record, bypassing classification
    pub fn push_record(&self, record: ManagedRecord) {
        self.inner.lock().unwrap().records.push(record);
    }

    pub fn fail_create(self, nth: usize) -> Self {
        self.inner.lock().unwrap().fault = Fault::FailCreate(nth);
        self
    }

    pub fn fail_delete(self, nth: usize) -> Self {
        self.inner.lock().unwrap().fault = Fault::FailDelete(nth);
        self
    }

    pub fn fail_list(self, family: RecordFamily) -> Self {
        self.inner.lock().unwrap().fault = Fault::FailList(family);
        self
    }

    pub fn cancel_during_create(self, nth: usize, token: CancellationToken) -> Self {
        self.inner.lock().unwrap().fault = Fault::CancelDuringCreate(nth, token);
        self
    }

    pub fn clear_fault(&self) {
        self.inner.lock().unwrap().fault = Fault::None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Contents of the stored records
    pub fn contents(&self) -> BTreeSet<String> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .map(|r| r.content.clone())
            .collect()
    }

    pub fn records(&self) -> Vec<ManagedRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    /// Number of create/delete calls made
    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::List(_)))
            .count()
    }
}

fn injected(status: u16, message: &str) -> Error {
    Error::provider_status("mock", status, message)
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(
        &self,
        zone: &str,
        name: &str,
        family: RecordFamily,
    ) -> Result<Vec<ManagedRecord>> {
        assert_eq!(zone, ZONE);
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::List(family));
        if let Fault::FailList(failing) = inner.fault {
            if failing == family {
                return Err(injected(500, "list failed"));
            }
        }
        Ok(inner
            .records
            .iter()
            .filter(|r| r.name == name && r.family == family)
            .cloned()
            .collect())
    }

    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<ManagedRecord> {
        assert_eq!(zone, ZONE);
        let cancel_token = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(Call::Create(record.content.clone()));
            inner.creates += 1;
            let nth = inner.creates;
            let hang = match &inner.fault {
                Fault::FailCreate(n) if *n == nth => {
                    return Err(injected(409, "create failed"));
                }
                Fault::CancelDuringCreate(n, token) if *n == nth => Some(token.clone()),
                _ => None,
            };
            match hang {
                Some(token) => token,
                None => {
                    inner.next_id += 1;
                    let stored = ManagedRecord {
                        id: format!("rec-{}", inner.next_id),
                        family: record.family,
                        name: record.name.clone(),
                        content: record.content.clone(),
                        ttl: record.ttl,
                    };
                    inner.records.push(stored.clone());
                    return Ok(stored);
                }
            }
        };

        // Simulates a request still in flight when the run is cancelled
        cancel_token.cancel();
        std::future::pending().await
    }

    async fn delete_record(&self, zone: &str, id: &str) -> Result<()> {
        assert_eq!(zone, ZONE);
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(id.to_string()));
        inner.deletes += 1;
        if let Fault::FailDelete(n) = inner.fault {
            if n == inner.deletes {
                return Err(injected(500, "delete failed"));
            }
        }
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(injected(404, "record not found"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build an engine over shared doubles
pub fn engine(resolver: ScriptedResolver, provider: &MockDnsProvider) -> AliasEngine {
    engine_with_ttl(resolver, provider, 0)
}

pub fn engine_with_ttl(
    resolver: ScriptedResolver,
    provider: &MockDnsProvider,
    ttl: u32,
) -> AliasEngine {
    AliasEngine::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        ZONE,
        AliasSpec::new(ALIAS, TARGET, ttl),
    )
    .expect("engine construction succeeds")
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
