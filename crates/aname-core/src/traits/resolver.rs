// # Address Resolver Trait
//
// Defines the interface for turning the target hostname into the set of
// address literals the alias should carry.
//
// ## Implementations
//
// - System resolver: `aname_core::resolver::SystemResolver`
// - Tests: scripted resolvers returning fixed sets

use async_trait::async_trait;
use std::collections::BTreeSet;

/// Trait for hostname resolution
///
/// Implementations return every address of both families. A failed lookup is
/// an error; there is no partial result.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve `host` into its current address literals
    ///
    /// # Returns
    ///
    /// - `Ok(BTreeSet<String>)`: The addresses, as text
    /// - `Err(Error::Resolution)`: If the lookup failed
    async fn resolve(&self, host: &str) -> Result<BTreeSet<String>, crate::Error>;
}
