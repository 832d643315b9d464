use async_trait::async_trait;
use identra_core::{well_known_by_id, IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::domains::DomainInfo;
use crate::error::{RequestError, Result};
use crate::ncache::NegativeCache;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::request::RequestData;

/// Group lookup by numeric id, negative-cached globally like
/// [`UserByIdPlugin`](super::UserByIdPlugin).
pub struct GroupByIdPlugin;

impl GroupByIdPlugin {
    fn id(data: &RequestData) -> Result<u32> {
        data.id
            .ok_or_else(|| RequestError::internal("numeric id is missing"))
    }
}

#[async_trait]
impl LookupPlugin for GroupByIdPlugin {
    fn name(&self) -> &'static str {
        "Group by ID"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::GroupById
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::Group
    }

    fn is_well_known(&self, data: &RequestData) -> Option<IdentityRecord> {
        well_known_by_id(data.id?, ObjectType::Group).map(|w| w.record())
    }

    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String {
        match data.id {
            Some(id) => format!("GID:{id}@{}", domain.name),
            None => format!("GID:<missing>@{}", domain.name),
        }
    }

    fn global_ncache_check(&self, ncache: &NegativeCache, data: &RequestData) -> bool {
        data.id
            .is_some_and(|id| ncache.check(self.kind(), None, &id.to_string()))
    }

    fn global_ncache_add(&self, ncache: &NegativeCache, data: &RequestData) {
        if let Some(id) = data.id {
            ncache.add(self.kind(), None, &id.to_string());
        }
    }

    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        let id = Self::id(data)?;
        Ok(store
            .lookup_by_id(&domain.name, ObjectType::Group, id)
            .await?)
    }

    fn dpreq_params(&self, data: &RequestData, _prior: &[IdentityRecord]) -> Result<ProviderParams> {
        Ok(ProviderParams {
            key: None,
            id: Some(Self::id(data)?),
            flag: None,
        })
    }
}
