//! An in-memory cache for API reads.
//!
//! Reads are identified by a [QueryKey]. Concurrent reads of the same key
//! share one request, results stay fresh for a configurable window, and
//! mutations invalidate whole key prefixes so the affected reads are fetched
//! again.

mod client;
mod key;
mod state;

pub use client::{
    CacheConfig, DEFAULT_GC_TIME, DEFAULT_STALE_TIME, QueryClient, QueryObserver,
};
pub use key::{KeyPart, QueryKey};
pub use state::QueryState;
