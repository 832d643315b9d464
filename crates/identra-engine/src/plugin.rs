//! The contract every lookup kind implements, and the static registry
//! selecting one plugin per [`LookupKind`].

use async_trait::async_trait;
use identra_core::{IdentityRecord, LookupKind};
use identra_store::{IdentityStore, ProviderRequestKind};

use crate::config::EngineConfig;
use crate::domains::{DomainFlags, DomainInfo};
use crate::error::Result;
use crate::ncache::NegativeCache;
use crate::plugins;
use crate::request::RequestData;

/// Provider-call parameters derived by a plugin for one domain attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderParams {
    pub key: Option<String>,
    pub id: Option<u32>,
    pub flag: Option<String>,
}

/// One lookup kind's behavior, plugged into the shared request engine.
///
/// The flag methods alter the engine's control flow; the callback methods
/// supply domain-specific behavior. Optional callbacks default to no-ops so
/// a plugin only writes what it actually customizes.
#[async_trait]
pub trait LookupPlugin: Send + Sync {
    /// Human-readable plugin name for diagnostics.
    fn name(&self) -> &'static str;

    fn kind(&self) -> LookupKind;

    /// Request class to refresh this identity under at the provider.
    fn provider_kind(&self) -> ProviderRequestKind;

    /// Record attribute holding the freshness deadline for this kind.
    fn expiration_attr(&self) -> &'static str {
        identra_core::attrs::CACHE_EXPIRE
    }

    // ==================== Control-flow flags ====================

    /// Whether the input name is split into name and domain parts.
    fn parse_name(&self) -> bool {
        false
    }

    /// Skip the cache check and always refresh from the provider.
    fn bypass_cache(&self) -> bool {
        false
    }

    /// Cap the result at one record, whatever the store returns.
    fn only_one_result(&self) -> bool {
        false
    }

    /// Keep iterating after a qualifying result and aggregate across
    /// domains.
    fn search_all_domains(&self) -> bool {
        false
    }

    /// Only consider domains that support enumeration.
    fn require_enumeration(&self) -> bool {
        false
    }

    /// Search domains requiring fully qualified names even for unqualified
    /// input.
    fn allow_missing_fqn(&self) -> bool {
        false
    }

    /// Retry the whole request once under [`Self::upn_equivalent`] when all
    /// domains come up empty.
    fn allow_switch_to_upn(&self) -> bool {
        false
    }

    fn upn_equivalent(&self) -> Option<LookupKind> {
        None
    }

    /// Trust-topology restrictions on domain traversal.
    fn get_next_domain_flags(&self) -> DomainFlags {
        DomainFlags {
            enumerable_only: self.require_enumeration(),
        }
    }

    // ==================== Callbacks ====================

    /// Resolves a reserved sentinel identity, bypassing cache and provider
    /// entirely. Checked once, before domain iteration begins.
    fn is_well_known(&self, _data: &RequestData) -> Option<IdentityRecord> {
        None
    }

    /// Rewrites the per-domain lookup key (case folding, space
    /// substitution). Fails `Internal` when a required precondition is
    /// missing.
    fn prepare_domain_data(
        &self,
        _data: &mut RequestData,
        _domain: &DomainInfo,
        _config: &EngineConfig,
    ) -> Result<()> {
        Ok(())
    }

    /// Human-readable identifier of the current attempt for diagnostics.
    /// Pure; no side effects.
    fn create_debug_name(&self, data: &RequestData, domain: &DomainInfo) -> String;

    /// Whether the negative cache marks this request absent globally.
    fn global_ncache_check(&self, _ncache: &NegativeCache, _data: &RequestData) -> bool {
        false
    }

    /// Whether the negative cache marks this request absent in `domain`.
    fn ncache_check(
        &self,
        _ncache: &NegativeCache,
        _domain: &DomainInfo,
        _data: &RequestData,
    ) -> bool {
        false
    }

    /// Records a confirmed-absent outcome for `domain`.
    fn ncache_add(&self, _ncache: &NegativeCache, _domain: &DomainInfo, _data: &RequestData) {}

    /// Records an absent-in-every-domain outcome. Called once, when the
    /// whole request terminates without a result; a kind whose identifier is
    /// not domain-scoped (numeric ids, certificates) marks it here instead
    /// of per domain.
    fn global_ncache_add(&self, _ncache: &NegativeCache, _data: &RequestData) {}

    /// Queries the cache store for this domain with the prepared key. Must
    /// not itself trigger a provider call.
    async fn lookup(
        &self,
        store: &dyn IdentityStore,
        data: &RequestData,
        domain: &DomainInfo,
    ) -> Result<Vec<IdentityRecord>>;

    /// Derives the provider-call parameters. `prior` is the preceding cache
    /// lookup result, available for disambiguation (e.g. by existing uid).
    fn dpreq_params(&self, data: &RequestData, prior: &[IdentityRecord]) -> Result<ProviderParams>;
}

/// Selects the plugin handling `kind`. Total; every kind has exactly one.
pub fn plugin_for(kind: LookupKind) -> &'static dyn LookupPlugin {
    match kind {
        LookupKind::UserByName => &plugins::UserByNamePlugin,
        LookupKind::UserByUpn => &plugins::UserByUpnPlugin,
        LookupKind::UserById => &plugins::UserByIdPlugin,
        LookupKind::UserByCert => &plugins::UserByCertPlugin,
        LookupKind::UserByFilter => &plugins::UserByFilterPlugin,
        LookupKind::GroupByName => &plugins::GroupByNamePlugin,
        LookupKind::GroupById => &plugins::GroupByIdPlugin,
        LookupKind::GroupByFilter => &plugins::GroupByFilterPlugin,
        LookupKind::EnumUsers => &plugins::EnumUsersPlugin,
        LookupKind::EnumGroups => &plugins::EnumGroupsPlugin,
        LookupKind::WellKnown => &plugins::WellKnownPlugin,
    }
}
