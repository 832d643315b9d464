//! The public request API: one entry point per lookup-kind family, each
//! constructing a request descriptor and driving the state machine to
//! completion.

use identra_core::{parse_qualified, LookupKind, RequestInput, WellKnownId};
use identra_store::{DynProvider, DynStore, IdentityStore};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domains::DomainSet;
use crate::error::{RequestError, Result};
use crate::inflight::InflightTable;
use crate::ncache::NegativeCache;
use crate::plugin::plugin_for;
use crate::request::{CacheRequest, LookupResult, RequestData};

/// The identity-cache lookup engine.
///
/// Holds the shared collaborators every request needs: the cache store, the
/// provider backend, the domain topology, the negative cache, and the
/// in-flight coalescer. Cheap to share behind an `Arc`; each request runs as
/// an independent task against the same instance.
pub struct Engine {
    store: DynStore,
    provider: DynProvider,
    domains: DomainSet,
    config: EngineConfig,
    ncache: NegativeCache,
    inflight: Arc<InflightTable>,
}

impl Engine {
    pub fn new(
        store: DynStore,
        provider: DynProvider,
        domains: DomainSet,
        config: EngineConfig,
    ) -> Self {
        let ncache = NegativeCache::new(config.negative_cache_ttl());
        Self {
            store,
            provider,
            domains,
            config,
            ncache,
            inflight: Arc::new(InflightTable::new()),
        }
    }

    pub(crate) fn store(&self) -> &dyn IdentityStore {
        self.store.as_ref()
    }

    pub(crate) fn provider(&self) -> DynProvider {
        Arc::clone(&self.provider)
    }

    pub(crate) fn domains(&self) -> &DomainSet {
        &self.domains
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn inflight(&self) -> &Arc<InflightTable> {
        &self.inflight
    }

    /// The engine's negative cache. Exposed so embedders can seed or flush
    /// it, e.g. after an enumeration learned authoritative absence.
    pub fn ncache(&self) -> &NegativeCache {
        &self.ncache
    }

    // ==================== Public request API ====================

    /// Looks up a user by name. `domain` pins the search to one domain; a
    /// qualified `name@domain` input pins likewise.
    pub async fn user_by_name(&self, domain: Option<&str>, name: &str) -> Result<LookupResult> {
        self.run(LookupKind::UserByName, domain, RequestInput::name(name))
            .await
    }

    /// Looks up a user by name with a numeric-id hint for provider-side
    /// disambiguation.
    pub async fn user_by_name_with_hint(
        &self,
        domain: Option<&str>,
        name: &str,
        id_hint: u32,
    ) -> Result<LookupResult> {
        self.run(
            LookupKind::UserByName,
            domain,
            RequestInput::Name {
                name: name.to_string(),
                id_hint: Some(id_hint),
            },
        )
        .await
    }

    /// Looks up a user by principal name.
    pub async fn user_by_upn(&self, domain: Option<&str>, upn: &str) -> Result<LookupResult> {
        self.run(LookupKind::UserByUpn, domain, RequestInput::name(upn))
            .await
    }

    /// Looks up a user by numeric id across all domains.
    pub async fn user_by_id(&self, id: u32) -> Result<LookupResult> {
        self.run(LookupKind::UserById, None, RequestInput::id(id))
            .await
    }

    /// Looks up the user holding the given DER certificate.
    pub async fn user_by_cert(&self, der: &[u8]) -> Result<LookupResult> {
        self.run(LookupKind::UserByCert, None, RequestInput::certificate(der))
            .await
    }

    /// Looks up users matching a wildcard filter.
    pub async fn users_by_filter(&self, domain: Option<&str>, filter: &str) -> Result<LookupResult> {
        self.run(LookupKind::UserByFilter, domain, RequestInput::filter(filter))
            .await
    }

    /// Looks up a group by name.
    pub async fn group_by_name(&self, domain: Option<&str>, name: &str) -> Result<LookupResult> {
        self.run(LookupKind::GroupByName, domain, RequestInput::name(name))
            .await
    }

    /// Looks up a group by numeric id across all domains.
    pub async fn group_by_id(&self, id: u32) -> Result<LookupResult> {
        self.run(LookupKind::GroupById, None, RequestInput::id(id))
            .await
    }

    /// Looks up groups matching a wildcard filter.
    pub async fn groups_by_filter(
        &self,
        domain: Option<&str>,
        filter: &str,
    ) -> Result<LookupResult> {
        self.run(LookupKind::GroupByFilter, domain, RequestInput::filter(filter))
            .await
    }

    /// Enumerates all users, aggregated across enumeration-capable domains.
    pub async fn enum_users(&self, domain: Option<&str>) -> Result<LookupResult> {
        self.run(LookupKind::EnumUsers, domain, RequestInput::Enumeration)
            .await
    }

    /// Enumerates all groups, aggregated across enumeration-capable domains.
    pub async fn enum_groups(&self, domain: Option<&str>) -> Result<LookupResult> {
        self.run(LookupKind::EnumGroups, domain, RequestInput::Enumeration)
            .await
    }

    /// Resolves a well-known sentinel identity.
    pub async fn well_known(&self, id: WellKnownId) -> Result<LookupResult> {
        self.run(LookupKind::WellKnown, None, RequestInput::sentinel(id))
            .await
    }

    async fn run(
        &self,
        kind: LookupKind,
        domain: Option<&str>,
        input: RequestInput,
    ) -> Result<LookupResult> {
        self.build_request(kind, domain, input)?.run().await
    }

    pub(crate) fn build_request(
        &self,
        kind: LookupKind,
        domain: Option<&str>,
        input: RequestInput,
    ) -> Result<CacheRequest<'_>> {
        let plugin = plugin_for(kind);
        let mut data = RequestData::new(kind, input, identra_core::now_utc());

        if plugin.parse_name() {
            if let Some(raw) = data.raw_name().map(str::to_string) {
                let names = self.domains.names();
                data.parsed = Some(parse_qualified(&raw, &names));
            }
        }

        let pin = match domain {
            Some(name) => {
                if self.domains.get(name).is_none() {
                    return Err(RequestError::unknown_domain(name));
                }
                Some(name.to_string())
            }
            None => data.parsed.as_ref().and_then(|p| p.domain.clone()),
        };

        Ok(CacheRequest::new(self, plugin, data, pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainInfo;
    use identra_store::{
        ProviderBackend, RefreshOutcome, RefreshRequest, RefreshStatus,
    };
    use identra_store::StoreError;

    struct NullStore;

    #[async_trait::async_trait]
    impl IdentityStore for NullStore {
        async fn lookup_by_name(
            &self,
            _domain: &str,
            _object_type: identra_core::ObjectType,
            _name: &str,
        ) -> std::result::Result<Vec<identra_core::IdentityRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn lookup_by_id(
            &self,
            _domain: &str,
            _object_type: identra_core::ObjectType,
            _id: u32,
        ) -> std::result::Result<Vec<identra_core::IdentityRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn lookup_by_filter(
            &self,
            _domain: &str,
            _object_type: identra_core::ObjectType,
            _filter: &str,
            _newer_than: Option<time::OffsetDateTime>,
        ) -> std::result::Result<Vec<identra_core::IdentityRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn lookup_by_cert(
            &self,
            _domain: &str,
            _der: &[u8],
        ) -> std::result::Result<Vec<identra_core::IdentityRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn enumerate(
            &self,
            _domain: &str,
            _object_type: identra_core::ObjectType,
        ) -> std::result::Result<Vec<identra_core::IdentityRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn upsert(
            &self,
            _domain: &str,
            _record: identra_core::IdentityRecord,
        ) -> std::result::Result<(), StoreError> {
            Ok(())
        }
        fn backend_name(&self) -> &'static str {
            "null"
        }
    }

    struct AbsentProvider;

    #[async_trait::async_trait]
    impl ProviderBackend for AbsentProvider {
        async fn refresh(&self, _request: RefreshRequest) -> RefreshOutcome {
            Ok(RefreshStatus::NotFound)
        }
        fn provider_name(&self) -> &'static str {
            "absent"
        }
    }

    fn engine() -> Engine {
        Engine::new(
            Arc::new(NullStore),
            Arc::new(AbsentProvider),
            DomainSet::new(vec![DomainInfo::new("corp.example.com")]),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_unknown_pin_is_an_error() {
        let err = engine()
            .user_by_name(Some("missing.example.com"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::UnknownDomain(_)));
    }

    #[tokio::test]
    async fn test_qualified_name_pins_domain() {
        let engine = engine();
        let request = engine
            .build_request(
                LookupKind::UserByName,
                None,
                RequestInput::name("alice@corp.example.com"),
            )
            .unwrap();
        // pin is private to the request; observable via the terminal
        // outcome: the only domain is searched and comes up absent.
        let err = request.run().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_domain_set_is_not_found() {
        let engine = Engine::new(
            Arc::new(NullStore),
            Arc::new(AbsentProvider),
            DomainSet::default(),
            EngineConfig::default(),
        );
        let err = engine.user_by_name(None, "alice").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
