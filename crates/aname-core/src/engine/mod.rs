//! Alias reconciliation engine
//!
//! The AliasEngine is responsible for:
//! - Resolving the target name via AddressResolver
//! - Listing the managed A/AAAA records via RecordStore
//! - Diffing the two sets
//! - Applying creations, then deletions, via DnsProvider
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐            ┌──────────────┐
//! │ AddressResolver │── desired ─▶│              │
//! └─────────────────┘            │ AliasEngine  │── create/delete ──▶ DnsProvider
//! ┌─────────────────┐            │              │
//! │  RecordStore    │── current ─▶│              │
//! └─────────────────┘            └──────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! 1. Resolve the target name
//! 2. List A and AAAA records named after the alias
//! 3. Compute the [`ReconcilePlan`]
//! 4. Create missing addresses
//! 5. Delete stale records
//!
//! The first error aborts the pass. Nothing is rolled back: the next pass
//! recomputes the plan from live provider state and converges.

mod diff;
mod family;
mod store;

pub use family::classify;
pub use diff::{ReconcilePlan, reconcile};
pub use store::RecordStore;

use crate::config::AliasSpec;
use crate::error::{Error, Result};
use crate::traits::{AddressResolver, DnsProvider, ManagedRecord, NewRecord};
use std::collections::BTreeSet;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Outcome of a successful pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Addresses the target resolved to
    pub resolved: BTreeSet<String>,
    /// Records created during the pass
    pub created: Vec<ManagedRecord>,
    /// Records deleted during the pass
    pub deleted: Vec<ManagedRecord>,
    /// Managed records that already matched
    pub unchanged: usize,
}

impl ReconcileReport {
    /// True when the pass made no changes
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Core alias engine
///
/// Performs one reconciliation pass per [`AliasEngine::run`] call. The engine
/// holds no state between passes; the provider is the only source of truth.
///
/// ## Lifecycle
///
/// 1. Create with [`AliasEngine::new()`]
/// 2. Call [`AliasEngine::run()`] once per invocation
/// 3. Scheduling further passes is up to the caller (timer, cron)
pub struct AliasEngine {
    /// Resolver for the target name
    resolver: Box<dyn AddressResolver>,

    /// DNS provider holding the managed records
    provider: Box<dyn DnsProvider>,

    /// Zone the alias lives in
    zone: String,

    /// The alias to maintain
    spec: AliasSpec,
}

impl AliasEngine {
    /// Create a new alias engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Resolver used for the target name
    /// - `provider`: DNS provider implementation
    /// - `zone`: Provider zone identifier
    /// - `spec`: The alias to maintain
    ///
    /// # Returns
    ///
    /// `Err(Error::Config)` if the zone, alias name or target name is empty
    pub fn new(
        resolver: Box<dyn AddressResolver>,
        provider: Box<dyn DnsProvider>,
        zone: impl Into<String>,
        spec: AliasSpec,
    ) -> Result<Self> {
        let zone = zone.into();
        if zone.is_empty() {
            return Err(Error::config("zone identifier cannot be empty"));
        }
        if spec.alias_name().is_empty() {
            return Err(Error::config("alias name cannot be empty"));
        }
        if spec.target_name().is_empty() {
            return Err(Error::config("target name cannot be empty"));
        }

        Ok(Self {
            resolver,
            provider,
            zone,
            spec,
        })
    }

    /// Run one reconciliation pass
    ///
    /// Every network call observes `cancel`; once it fires, the in-flight
    /// call fails with [`Error::Cancelled`] and the pass stops with whatever
    /// was already applied left in place.
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: The managed set now equals the resolved set
    /// - `Err(Error)`: The first failure, unchanged
    pub async fn run(&self, cancel: &CancellationToken) -> Result<ReconcileReport> {
        let target = self.spec.target_name();
        let alias = self.spec.alias_name();

        let resolved = cancellable(cancel, self.resolver.resolve(target)).await?;
        info!("{} resolves to {} address(es)", target, resolved.len());

        let store = RecordStore::new(self.provider.as_ref(), &self.zone);
        let current = cancellable(cancel, store.fetch_managed(alias)).await?;

        let plan = reconcile(&current, &resolved);
        let unchanged = current.len() - plan.to_delete.len();
        if plan.is_empty() {
            info!("{} is up to date ({} record(s))", alias, unchanged);
            return Ok(ReconcileReport {
                resolved,
                unchanged,
                ..Default::default()
            });
        }

        debug!(
            "Plan for {}: {} to create, {} to delete",
            alias,
            plan.to_create.len(),
            plan.to_delete.len()
        );

        let (created, deleted) = self.apply(&plan, cancel).await?;

        Ok(ReconcileReport {
            resolved,
            created,
            deleted,
            unchanged,
        })
    }

    /// Apply a plan: every creation first, then every deletion
    ///
    /// Creating before deleting keeps the alias from transiently losing an
    /// address it still needs if the pass is interrupted.
    async fn apply(
        &self,
        plan: &ReconcilePlan,
        cancel: &CancellationToken,
    ) -> Result<(Vec<ManagedRecord>, Vec<ManagedRecord>)> {
        let alias = self.spec.alias_name();
        let provider = self.provider.provider_name();

        let mut created = Vec::with_capacity(plan.to_create.len());
        for address in &plan.to_create {
            let family = classify(address)?;
            let record = NewRecord::new(family, alias, address.as_str(), self.spec.ttl());
            let stored =
                cancellable(cancel, self.provider.create_record(&self.zone, &record)).await?;
            info!(
                "Created {} record {} -> {} (id: {}, provider: {})",
                family, alias, address, stored.id, provider
            );
            created.push(stored);
        }

        let mut deleted = Vec::with_capacity(plan.to_delete.len());
        for record in &plan.to_delete {
            cancellable(cancel, self.provider.delete_record(&self.zone, &record.id)).await?;
            info!(
                "Deleted {} record {} -> {} (id: {}, provider: {})",
                record.family, alias, record.content, record.id, provider
            );
            deleted.push(record.clone());
        }

        Ok((created, deleted))
    }
}

/// Race a network call against the cancellation token
async fn cancellable<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}
