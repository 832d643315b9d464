//! In-memory identity cache store.
//!
//! This crate provides an in-memory implementation of the `IdentityStore`
//! trait from `identra-store`, using papaya lock-free HashMap for concurrent
//! access. It backs the engine's test suites and small embedded deployments.
//!
//! # Example
//!
//! ```ignore
//! use identra_store_memory::MemoryStore;
//! use identra_store::IdentityStore;
//! use identra_core::{IdentityRecord, ObjectType};
//!
//! let store = MemoryStore::new();
//! store.upsert("corp.example.com", IdentityRecord::new(ObjectType::User, "alice", 1000)).await?;
//! let found = store.lookup_by_name("corp.example.com", ObjectType::User, "alice").await?;
//! ```

mod filter;
mod store;

pub use filter::{glob_match, ParsedFilter};
pub use store::MemoryStore;

// Re-export the store trait for convenience
pub use identra_store::{IdentityStore, StoreError};

/// Creates a new shared in-memory IdentityStore instance.
pub fn create_memory_store() -> identra_store::DynStore {
    std::sync::Arc::new(MemoryStore::new())
}
