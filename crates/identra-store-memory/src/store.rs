use crate::filter::{glob_match, ParsedFilter};
use async_trait::async_trait;
use identra_core::{IdentityRecord, ObjectType};
use identra_store::{IdentityStore, StoreError};
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use time::OffsetDateTime;

pub(crate) type StorageKey = String; // "domain<US>type<US>name", US = unit separator

pub(crate) fn make_storage_key(domain: &str, object_type: ObjectType, name: &str) -> StorageKey {
    format!("{domain}\u{1f}{object_type}\u{1f}{name}")
}

fn key_prefix(domain: &str, object_type: ObjectType) -> String {
    format!("{domain}\u{1f}{object_type}\u{1f}")
}

/// In-memory identity store backed by a papaya lock-free HashMap.
///
/// Records are keyed by (domain, object type, name); a write for an existing
/// key replaces the record wholesale, matching refresh semantics where the
/// provider's view wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Arc<PapayaHashMap<StorageKey, IdentityRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
        }
    }

    /// Number of records currently held, across all domains.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes a record, returning whether it was present.
    pub fn remove(&self, domain: &str, object_type: ObjectType, name: &str) -> bool {
        let key = make_storage_key(domain, object_type, name);
        self.data.pin().remove(&key).is_some()
    }

    // Full scan of the map, clone and sort per call. The only index is the
    // name key, so id, filter, and enumeration reads all pay this cost; keep
    // this store to test fixtures and small record sets.
    fn collect_domain(&self, domain: &str, object_type: ObjectType) -> Vec<IdentityRecord> {
        let prefix = key_prefix(domain, object_type);
        let guard = self.data.pin();
        let mut records: Vec<IdentityRecord> = guard
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, rec)| rec.clone())
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    fn record_attr_matches(record: &IdentityRecord, filter: &ParsedFilter) -> bool {
        match filter.attr.as_str() {
            "name" => glob_match(&filter.pattern, &record.name),
            "userPrincipalName" => record
                .upn
                .as_deref()
                .is_some_and(|upn| glob_match(&filter.pattern, upn)),
            other => record
                .attrs
                .get(other)
                .is_some_and(|value| glob_match(&filter.pattern, value)),
        }
    }

    fn refreshed_since(record: &IdentityRecord, bound: Option<OffsetDateTime>) -> bool {
        match bound {
            Some(ts) => record
                .last_update()
                .is_some_and(|updated| updated >= ts.unix_timestamp()),
            None => true,
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn lookup_by_name(
        &self,
        domain: &str,
        object_type: ObjectType,
        name: &str,
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        let key = make_storage_key(domain, object_type, name);
        let guard = self.data.pin();
        Ok(guard.get(&key).cloned().into_iter().collect())
    }

    async fn lookup_by_id(
        &self,
        domain: &str,
        object_type: ObjectType,
        id: u32,
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        Ok(self
            .collect_domain(domain, object_type)
            .into_iter()
            .filter(|rec| rec.id == id)
            .collect())
    }

    async fn lookup_by_filter(
        &self,
        domain: &str,
        object_type: ObjectType,
        filter: &str,
        newer_than: Option<OffsetDateTime>,
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        let parsed = ParsedFilter::parse(filter)?;
        Ok(self
            .collect_domain(domain, object_type)
            .into_iter()
            .filter(|rec| Self::record_attr_matches(rec, &parsed))
            .filter(|rec| Self::refreshed_since(rec, newer_than))
            .collect())
    }

    async fn lookup_by_cert(
        &self,
        domain: &str,
        der: &[u8],
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        Ok(self
            .collect_domain(domain, ObjectType::User)
            .into_iter()
            .filter(|rec| rec.certificate.as_deref() == Some(der))
            .collect())
    }

    async fn enumerate(
        &self,
        domain: &str,
        object_type: ObjectType,
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        Ok(self.collect_domain(domain, object_type))
    }

    async fn upsert(&self, domain: &str, record: IdentityRecord) -> Result<(), StoreError> {
        let key = make_storage_key(domain, record.object_type, &record.name);
        self.data.pin().insert(key, record);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
