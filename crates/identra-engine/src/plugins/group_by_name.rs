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

/// Group lookup by (possibly qualified) name.
pub struct GroupByNamePlugin;

#[async_trait]
impl LookupPlugin for GroupByNamePlugin {
    fn name(&self) -> &'static str {
        "Group by name"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::GroupByName
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::Group
    }

    fn parse_name(&self) -> bool {
        true
    }

    fn is_well_known(&self, data: &RequestData) -> Option<IdentityRecord> {
        let parsed = data.parsed.as_ref()?;
        if parsed.domain.is_some() {
            return None;
        }
        well_known_by_name(&parsed.name, ObjectType::Group).map(|w| w.record())
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
            "GROUP:{}@{}",
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
            .lookup_by_name(&domain.name, ObjectType::Group, name)
            .await?)
    }

    fn dpreq_params(&self, data: &RequestData, prior: &[IdentityRecord]) -> Result<ProviderParams> {
        let name = data.lookup_name()?.to_string();
        Ok(ProviderParams {
            key: Some(name),
            id: prior.first().map(|rec| rec.id),
            flag: None,
        })
    }
}
