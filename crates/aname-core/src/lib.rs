// # aname-core
//
// Core library for synthesizing an ALIAS/ANAME record.
//
// DNS has no apex-level alias record type, so the alias is emulated by keeping
// a set of literal A/AAAA records under the alias name equal to the current
// resolution of a target hostname.
//
// ## Architecture Overview
//
// - **AddressResolver**: Trait for resolving the target hostname
// - **DnsProvider**: Trait for listing, creating and deleting provider records
// - **RecordStore**: Fetches the managed A and AAAA records for the alias
// - **AliasEngine**: Diffs resolved addresses against managed records and
//   applies the creations and deletions
//
// ## Design Principles
//
// 1. **Single pass**: One reconciliation per invocation; scheduling is external
// 2. **Stateless**: The provider is the only source of truth
// 3. **Creates before deletes**: An interrupted pass never drops a live address
// 4. **Idempotency**: Re-running with unchanged inputs performs no mutations

pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod traits;

// Re-export core types for convenience
pub use config::{AliasSpec, AppConfig, DEFAULT_TTL};
pub use engine::{AliasEngine, ReconcilePlan, ReconcileReport, RecordStore, classify, reconcile};
pub use error::{Error, Result};
pub use resolver::SystemResolver;
pub use traits::{AddressResolver, DnsProvider, ManagedRecord, NewRecord, RecordFamily};
pub use tokio_util::sync::CancellationToken;
