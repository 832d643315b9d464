use async_trait::async_trait;
use identra_core::{well_known_by_name, IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::config::EngineConfig;
use crate::domains::DomainInfo;
use crate::error::Result;
use crate::ncache::NegativeCache;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::plugins::prepare_name_key;
use crate::request::RequestData;

/// User lookup by (possibly qualified) name, with a one-shot retry as a
/// principal-name lookup when every domain comes up empty.
pub struct UserByNamePlugin;

#[async_trait]
impl LookupPlugin for UserByNamePlugin {
    fn name(&self) -> &'static str {
        "User by name"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::UserByName
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::User
    }

    fn parse_name(&self) -> bool {
        true
    }

    fn allow_switch_to_upn(&self) -> bool {
        true
    }

    fn upn_equivalent(&self) -> Option<LookupKind> {
        Some(LookupKind::UserByUpn)
    }

    fn is_well_known(&self, data: &RequestData) -> Option<IdentityRecord> {
        let parsed = data.parsed.as_ref()?;
        if parsed.domain.is_some() {
            return None;
        }
        well_known_by_name(&parsed.name, ObjectType::User).map(|w| w.record())
    }

    fn prepare_domain_data(
        &self,
        data: &mut RequestData,
        domain: &DomainInfo,
        config: &EngineConfig,
    ) -> Result<()> {
        prepare_name_key(data, domain, config)
    }

    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String {
        format!(
            "{}@{}",
            data.lookup_name.as_deref().unwrap_or("<unprepared>"),
            domain.name
        )
    }

    fn ncache_check(&self, ncache: &NegativeCache, domain: &DomainInfo, data: &RequestData) -> bool {
        data.lookup_name
            .as_deref()
            .is_some_and(|name| ncache.check(self.kind(), Some(&domain.name), name))
    }

    fn ncache_add(&self, ncache: &NegativeCache, domain: &DomainInfo, data: &RequestData) {
        if let Some(name) = data.lookup_name.as_deref() {
            ncache.add(self.kind(), Some(&domain.name), name);
        }
    }

    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        let name = data.lookup_name()?;
        Ok(store
            .lookup_by_name(&domain.name, ObjectType::User, name)
            .await?)
    }

    fn dpreq_params(&self, data: &RequestData, prior: &[IdentityRecord]) -> Result<ProviderParams> {
        let name = data.lookup_name()?.to_string();
        Ok(ProviderParams {
            key: Some(name),
            // An already-cached uid pins the provider to the same entry.
            id: prior.first().map(|rec| rec.id).or(data.id),
            flag: None,
        })
    }
}
