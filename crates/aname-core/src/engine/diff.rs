//! Diff between the managed records and the resolved addresses

use crate::traits::ManagedRecord;
use std::collections::{BTreeSet, HashSet};

/// Mutations needed to make the managed set equal the resolved set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Resolved addresses with no managed record, in ascending order
    pub to_create: BTreeSet<String>,
    /// Managed records whose content is no longer resolved
    pub to_delete: Vec<ManagedRecord>,
}

impl ReconcilePlan {
    /// True when the managed set already matches
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// Number of provider mutations the plan implies
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_delete.len()
    }
}

/// Compute the creations and deletions for one pass
///
/// Matching is exact string equality on the record content. Records whose
/// content is still resolved are left alone whatever their TTL.
pub fn reconcile(current: &[ManagedRecord], desired: &BTreeSet<String>) -> ReconcilePlan {
    let present: HashSet<&str> = current.iter().map(|r| r.content.as_str()).collect();

    let to_create = desired
        .iter()
        .filter(|address| !present.contains(address.as_str()))
        .cloned()
        .collect();

    let to_delete = current
        .iter()
        .filter(|record| !desired.contains(&record.content))
        .cloned()
        .collect();

    ReconcilePlan {
        to_create,
        to_delete,
    }
}
