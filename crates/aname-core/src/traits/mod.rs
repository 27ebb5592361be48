//! Core traits for the alias synchronizer
//!
//! This module defines the seams the engine is built against.
//!
//! - [`DnsProvider`]: List, create and delete records at the DNS provider
//! - [`AddressResolver`]: Resolve the target hostname

pub mod dns_provider;
pub mod resolver;

pub use dns_provider::{DnsProvider, ManagedRecord, NewRecord, RecordFamily};
pub use resolver::AddressResolver;
