//! Which cached reads a successful mutation makes stale.

use std::fmt::Display;

use crate::{
    Error,
    cache::{QueryClient, QueryKey},
};

/// A REST resource, also the first part of every query key for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Income and expense transactions.
    Transactions,
    /// Transaction categories.
    Categories,
    /// Aggregates computed from transactions. Read-only.
    Statistics,
    /// Spending budgets.
    Budgets,
}

impl Resource {
    /// The name used as the first part of query keys, e.g. "transactions".
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Transactions => "transactions",
            Resource::Categories => "categories",
            Resource::Statistics => "statistics",
            Resource::Budgets => "budgets",
        }
    }

    /// A query key prefix matching every read of this resource.
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.name())
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The resources whose cached reads must be refetched after `mutated` changes.
///
/// Statistics are derived from transactions and show category names, so
/// changing either invalidates them too.
pub fn affected_resources(mutated: Resource) -> &'static [Resource] {
    match mutated {
        Resource::Transactions => &[Resource::Transactions, Resource::Statistics],
        Resource::Categories => &[Resource::Categories, Resource::Statistics],
        Resource::Budgets => &[Resource::Budgets],
        Resource::Statistics => &[],
    }
}

/// Invalidate every cached read affected by a successful change to `mutated`.
pub fn invalidate_after_mutation(cache: &QueryClient, mutated: Resource) -> Result<(), Error> {
    for resource in affected_resources(mutated) {
        cache.invalidate_queries(&resource.key())?;
    }

    Ok(())
}
