//! Enumeration plugins: list every user or group across all
//! enumeration-capable domains, refreshing each domain first.

use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind, ObjectType};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::domains::DomainInfo;
use crate::error::Result;
use crate::plugin::{LookupPlugin, ProviderParams};
use crate::request::RequestData;

macro_rules! enumeration_plugin {
    ($plugin:ident, $display:literal, $kind:expr, $provider_kind:expr, $object_type:expr, $label:literal) => {
        pub struct $plugin;

        #[async_trait]
        impl LookupPlugin for $plugin {
            fn name(&self) -> &'static str {
                $display
            }

            fn kind(&self) -> LookupKind {
                $kind
            }

            fn provider_kind(&self) -> ProviderRequestKind {
                $provider_kind
            }

            fn bypass_cache(&self) -> bool {
                true
            }

            fn search_all_domains(&self) -> bool {
                true
            }

            fn require_enumeration(&self) -> bool {
                true
            }

            fn create_debug_name(&self, _data: &RequestData, domain: &DomainInfo) -> String {
                format!(concat!($label, "@{}"), domain.name)
            }

            async fn lookup(
                &self,
                store: &dyn IdentityStore,
                _data: &RequestData,
                domain: &DomainInfo,
            ) -> Result<Vec<IdentityRecord>> {
                Ok(store.enumerate(&domain.name, $object_type).await?)
            }

            fn dpreq_params(
                &self,
                _data: &RequestData,
                _prior: &[IdentityRecord],
            ) -> Result<ProviderParams> {
                Ok(ProviderParams::default())
            }
        }
    };
}

enumeration_plugin!(
    EnumUsersPlugin,
    "Enumerate users",
    LookupKind::EnumUsers,
    ProviderRequestKind::EnumUsers,
    ObjectType::User,
    "enum-users"
);

enumeration_plugin!(
    EnumGroupsPlugin,
    "Enumerate groups",
    LookupKind::EnumGroups,
    ProviderRequestKind::EnumGroups,
    ObjectType::Group,
    "enum-groups"
);
