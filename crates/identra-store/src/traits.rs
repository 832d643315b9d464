//! The cache-store trait every storage backend must implement.

use async_trait::async_trait;
use identra_core::{IdentityRecord, ObjectType};
use time::OffsetDateTime;

use crate::error::StoreError;

/// Persistent identity cache consumed by the lookup engine.
///
/// Implementations must be thread-safe (`Send + Sync`). Lookups return all
/// matching records in store order; a missing identity is an empty `Vec`,
/// never an error. Lookups must not themselves trigger a backend refresh.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks up records by exact (already normalized) name within a domain.
    async fn lookup_by_name(
        &self,
        domain: &str,
        object_type: ObjectType,
        name: &str,
    ) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Looks up records by numeric id within a domain.
    async fn lookup_by_id(
        &self,
        domain: &str,
        object_type: ObjectType,
        id: u32,
    ) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Looks up records matching an `(attr=pattern)` filter within a domain.
    ///
    /// `pattern` may contain `*` wildcards. When `newer_than` is set, only
    /// records whose last refresh is at or after that instant are returned;
    /// wildcard lookups use this to see exactly what a backend refresh wrote.
    async fn lookup_by_filter(
        &self,
        domain: &str,
        object_type: ObjectType,
        filter: &str,
        newer_than: Option<OffsetDateTime>,
    ) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Looks up user records carrying the given DER certificate.
    async fn lookup_by_cert(
        &self,
        domain: &str,
        der: &[u8],
    ) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Returns every record of the given class in a domain.
    async fn enumerate(
        &self,
        domain: &str,
        object_type: ObjectType,
    ) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Inserts or replaces a record, keyed by (domain, type, name).
    async fn upsert(&self, domain: &str, record: IdentityRecord) -> Result<(), StoreError>;

    /// Returns the name of this store backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that IdentityStore is object-safe
    fn _assert_store_object_safe(_: &dyn IdentityStore) {}
}
