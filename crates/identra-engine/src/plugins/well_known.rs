use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::domains::DomainInfo;
use crate::error::{RequestError, Result};
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::request::RequestData;

/// Direct resolution of a well-known sentinel identity. The sentinel check
/// always answers, so the engine never reaches the cache or the provider
/// for this kind.
pub struct WellKnownPlugin;

#[async_trait]
impl LookupPlugin for WellKnownPlugin {
    fn name(&self) -> &'static str {
        "Well-known object"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::WellKnown
    }

    // Never dispatched; the sentinel short-circuits before backend dispatch.
    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::User
    }

    fn is_well_known(&self, data: &RequestData) -> Option<IdentityRecord> {
        data.sentinel.map(|id| id.record())
    }

    fn create_debug_name(&self, data: &RequestData, _domain: &DomainInfo) -> String {
        match data.sentinel {
            Some(id) => format!("WELL-KNOWN:{id}"),
            None => "WELL-KNOWN:<missing>".to_string(),
        }
    }

    async fn lookup(
        &self,
        _store: &dyn IdentityStore,
        _data: &RequestData,
        _domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        Err(RequestError::internal(
            "well-known requests never reach the cache store",
        ))
    }

    fn dpreq_params(&self, _data: &RequestData, _prior: &[IdentityRecord]) -> Result<ProviderParams> {
        Err(RequestError::internal(
            "well-known requests never reach the provider",
        ))
    }
}
