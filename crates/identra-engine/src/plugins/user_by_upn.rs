use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::config::EngineConfig;
use crate::domains::DomainInfo;
use crate::error::Result;
use crate::ncache::NegativeCache;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::plugins::prepare_name_key;
use crate::request::RequestData;

/// Provider flag telling the backend the identifier is a principal name,
/// not an account name.
const FLAG_NAME_IS_UPN: &str = "name-is-upn";

/// User lookup by principal name. Also the fallback target of
/// [`UserByNamePlugin`](super::UserByNamePlugin).
pub struct UserByUpnPlugin;

#[async_trait]
impl LookupPlugin for UserByUpnPlugin {
    fn name(&self) -> &'static str {
        "User by UPN"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::UserByUpn
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::User
    }

    fn parse_name(&self) -> bool {
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

    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String {
        format!(
            "UPN:{}@{}",
            data.lookup_name.as_deref().unwrap_or("<unprepared>"),
            domain.name
        )
    }

    fn ncache_check(&self, ncache: &NegativeCache, domain: &DomainInfo, data: &RequestData) -> bool {
        data.lookup_name
            .as_deref()
            .is_some_and(|upn| ncache.check(self.kind(), Some(&domain.name), upn))
    }

    fn ncache_add(&self, ncache: &NegativeCache, domain: &DomainInfo, data: &RequestData) {
        if let Some(upn) = data.lookup_name.as_deref() {
            ncache.add(self.kind(), Some(&domain.name), upn);
        }
    }

    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        let upn = data.lookup_name()?;
        Ok(store
            .lookup_by_filter(
                &domain.name,
                ObjectType::User,
                &format!("(userPrincipalName={upn})"),
                None,
            )
            .await?)
    }

    fn dpreq_params(&self, data: &RequestData, prior: &[IdentityRecord]) -> Result<ProviderParams> {
        let upn = data.lookup_name()?.to_string();
        Ok(ProviderParams {
            key: Some(upn),
            id: prior.first().map(|rec| rec.id),
            flag: Some(FLAG_NAME_IS_UPN.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identra_core::{ParsedName, RequestInput};
    use time::OffsetDateTime;

    #[test]
    fn test_dpreq_params_carries_upn_flag() {
        let mut data = RequestData::new(
            LookupKind::UserByUpn,
            RequestInput::name("alice@idp.example.net"),
            OffsetDateTime::now_utc(),
        );
        data.parsed = Some(ParsedName::unqualified("alice@idp.example.net"));
        data.lookup_name = Some("alice@idp.example.net".to_string());

        let params = UserByUpnPlugin.dpreq_params(&data, &[]).unwrap();
        assert_eq!(params.key.as_deref(), Some("alice@idp.example.net"));
        assert_eq!(params.flag.as_deref(), Some(FLAG_NAME_IS_UPN));
    }
}
