use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::domains::DomainInfo;
use crate::error::{RequestError, Result};
use crate::ncache::NegativeCache;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::request::{hex_encode, RequestData};

/// User lookup by DER certificate. A certificate maps to at most one user,
/// so the result is capped at one record; absence is negative-cached
/// globally under the hex-encoded certificate.
pub struct UserByCertPlugin;

impl UserByCertPlugin {
    fn cert_hex(data: &RequestData) -> Result<String> {
        data.certificate
            .as_deref()
            .map(hex_encode)
            .ok_or_else(|| RequestError::internal("certificate is missing"))
    }
}

#[async_trait]
impl LookupPlugin for UserByCertPlugin {
    fn name(&self) -> &'static str {
        "User by certificate"
    }

    fn kind(&self) -> LookupKind {
        LookupKind::UserByCert
    }

    fn provider_kind(&self) -> ProviderRequestKind {
        ProviderRequestKind::UserByCert
    }

    fn only_one_result(&self) -> bool {
        true
    }

    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String {
        match Self::cert_hex(data) {
            Ok(hex) => format!("CERT:{hex}@{}", domain.name),
            Err(_) => format!("CERT:<missing>@{}", domain.name),
        }
    }

    fn global_ncache_check(&self, ncache: &NegativeCache, data: &RequestData) -> bool {
        Self::cert_hex(data)
            .map(|hex| ncache.check(self.kind(), None, &hex))
            .unwrap_or(false)
    }

    fn global_ncache_add(&self, ncache: &NegativeCache, data: &RequestData) {
        if let Ok(hex) = Self::cert_hex(data) {
            ncache.add(self.kind(), None, &hex);
        }
    }

    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>> {
        let der = data
            .certificate
            .as_deref()
            .ok_or_else(|| RequestError::internal("certificate is missing"))?;
        Ok(store.lookup_by_cert(&domain.name, der).await?)
    }

    fn dpreq_params(&self, data: &RequestData, _prior: &[IdentityRecord]) -> Result<ProviderParams> {
        Ok(ProviderParams {
            key: Some(Self::cert_hex(data)?),
            id: None,
            flag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identra_core::RequestInput;
    use time::OffsetDateTime;

    #[test]
    fn test_dpreq_params_hex_encodes() {
        let data = RequestData::new(
            LookupKind::UserByCert,
            RequestInput::certificate(vec![0x30, 0x82, 0xab]),
            OffsetDateTime::now_utc(),
        );
        let params = UserByCertPlugin.dpreq_params(&data, &[]).unwrap();
        assert_eq!(params.key.as_deref(), Some("3082ab"));
    }

    #[test]
    fn test_missing_certificate_is_internal() {
        let data = RequestData::new(
            LookupKind::UserByCert,
            RequestInput::Enumeration,
            OffsetDateTime::now_utc(),
        );
        assert!(UserByCertPlugin.dpreq_params(&data, &[]).is_err());
    }
}
