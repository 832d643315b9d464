use async_trait::async_trait;
use identra_core::{well_known_by_id, IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::domains::DomainInfo;
use crate::error::{RequestError, Result};
use crate::ncache::NegativeCache;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::request::RequestData;

/// User lookup by numeric id. Ids are not domain-scoped from the caller's
/// point of view, so absence is negative-cached globally.
pub struct UserByIdPlugin;

impl UserByIdPlugin {
    fn id(data: &RequestData) -> Result<u32> {
        data.id
            .ok_or_else(|| RequestError::internal("numeric id is missing"))
    }
}

#[async_trait]
impl LookupPlugin for UserByIdPlugin {
    fn name(&self) -> &'static str {
        "User by ID"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::UserById
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::User
    }

    fn is_well_known(&self, data: &RequestData) -> Option<IdentityRecord> {
        well_known_by_id(data.id?, ObjectType::User).map(|w| w.record())
    }

    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String {
        match data.id {
            Some(id) => format!("UID:{id}@{}", domain.name),
            None => format!("UID:<missing>@{}", domain.name),
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
        Ok(store.lookup_by_id(&domain.name, ObjectType::User, id).await?)
    }

    fn dpreq_params(&self, data: &RequestData, _prior: &[IdentityRecord]) -> Result<ProviderParams> {
        Ok(ProviderParams {
            key: None,
            id: Some(Self::id(data)?),
            flag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identra_core::RequestInput;
    use time::OffsetDateTime;

    fn data(id: u32) -> RequestData {
        RequestData::new(
            LookupKind::UserById,
            RequestInput::id(id),
            OffsetDateTime::now_utc(),
        )
    }

    #[test]
    fn test_well_known_overflow_uid() {
        let record = UserByIdPlugin.is_well_known(&data(65534)).unwrap();
        assert_eq!(record.name, "nobody");
        assert!(UserByIdPlugin.is_well_known(&data(1000)).is_none());
    }

    #[test]
    fn test_dpreq_params_carries_id_only() {
        let params = UserByIdPlugin.dpreq_params(&data(1000), &[]).unwrap();
        assert_eq!(params.id, Some(1000));
        assert_eq!(params.key, None);
    }
}
