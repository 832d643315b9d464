use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::config::EngineConfig;
use crate::domains::DomainInfo;
use crate::error::Result;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::plugins::prepare_name_key;
use crate::request::RequestData;

/// Wildcard group lookup, the group-side twin of
/// [`UserByFilterPlugin`](super::UserByFilterPlugin).
pub struct GroupByFilterPlugin;

#[async_trait]
impl LookupPlugin for GroupByFilterPlugin {
    fn name(&self) -> &'static str {
        "Group by filter"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::GroupByFilter
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::WildcardGroup
    }

    fn parse_name(&self) -> bool {
        true
    }

    fn bypass_cache(&self) -> bool {
        true
    }

    fn prepare_domain_data(
        &self,
        data: &mut RequestData,
        domain: &DomainInfo,
        config: &EngineConfig,
    ) -> Result<()> {
        prepare_name_key(data, domain, config)
    }

    fn create_debug_name(&self, data: &RequestData, _domain: &DomainInfo) -> String {
        data.lookup_name
            .as_deref()
            .unwrap_or("<unprepared>")
            .to_string()
    }

    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        let pattern = data.lookup_name()?;
        Ok(store
            .lookup_by_filter(
                &domain.name,
                ObjectType::Group,
                pattern,
                Some(data.req_start),
            )
            .await?)
    }

    fn dpreq_params(&self, data: &RequestData, _prior: &[IdentityRecord]) -> Result<ProviderParams> {
        Ok(ProviderParams {
            key: Some(data.lookup_name()?.to_string()),
            id: data.id,
            flag: None,
        })
    }
}
