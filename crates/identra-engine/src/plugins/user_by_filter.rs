use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::config::EngineConfig;
use crate::domains::DomainInfo;
use crate::error::Result;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::plugins::prepare_name_key;
use crate::request::RequestData;

/// Wildcard user lookup. Always refreshes from the provider, then reads
/// back only records written since the request started, so stale matches
/// from earlier refreshes never leak into the result.
pub struct UserByFilterPlugin;

#[async_trait]
impl LookupPlugin for UserByFilterPlugin {
    fn name(&self) -> &'static str {
        "User by filter"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::UserByFilter
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::WildcardUser
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
                ObjectType::User,
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
