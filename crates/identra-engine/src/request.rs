//! The cache-request state machine: per-domain attempt loop, freshness
//! evaluation, negative-cache short-circuiting, and coalesced provider
//! dispatch.

use identra_core::{IdentityRecord, LookupKind, ParsedName, RequestInput, WellKnownId};
use identra_store::{ProviderError, RefreshRequest, RefreshStatus};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domains::DomainInfo;
use crate::engine::Engine;
use crate::error::{RequestError, Result};
use crate::plugin::LookupPlugin;

/// Mutable working state owned exclusively by one in-flight request.
///
/// Created at request start and dropped when the request reaches a terminal
/// state; `lookup_name` is rewritten once per domain attempt because casing
/// and space rules are domain-dependent.
#[derive(Debug, Clone)]
pub struct RequestData {
    pub kind: LookupKind,
    pub input: RequestInput,
    /// Input name split into name and domain parts, when the plugin parses
    /// names.
    pub parsed: Option<ParsedName>,
    /// Per-domain normalized lookup key, set by `prepare_domain_data`.
    pub lookup_name: Option<String>,
    pub id: Option<u32>,
    pub filter: Option<String>,
    pub certificate: Option<Vec<u8>>,
    pub sentinel: Option<WellKnownId>,
    /// Instant the request started; wildcard lookups use it as a recency
    /// bound so they only observe what the refresh wrote.
    pub req_start: OffsetDateTime,
}

impl RequestData {
    pub fn new(kind: LookupKind, input: RequestInput, req_start: OffsetDateTime) -> Self {
        let mut data = Self {
            kind,
            parsed: None,
            lookup_name: None,
            id: None,
            filter: None,
            certificate: None,
            sentinel: None,
            req_start,
            input,
        };
        match &data.input {
            RequestInput::Name { id_hint, .. } => data.id = *id_hint,
            RequestInput::Id { id } => data.id = Some(*id),
            RequestInput::Filter { filter } => data.filter = Some(filter.clone()),
            RequestInput::Certificate { der } => data.certificate = Some(der.clone()),
            RequestInput::Sentinel { id } => data.sentinel = Some(*id),
            RequestInput::Enumeration => {}
        }
        data
    }

    /// The raw string a name-parsing plugin splits: the input name, or the
    /// input filter for wildcard kinds.
    pub fn raw_name(&self) -> Option<&str> {
        match &self.input {
            RequestInput::Name { name, .. } => Some(name),
            RequestInput::Filter { filter } => Some(filter),
            _ => None,
        }
    }

    /// The parsed name, which name-parsing plugins may rely on.
    pub fn parsed_name(&self) -> Result<&ParsedName> {
        self.parsed
            .as_ref()
            .ok_or_else(|| RequestError::internal("parsed name is missing"))
    }

    /// The per-domain lookup key prepared for the current attempt.
    pub fn lookup_name(&self) -> Result<&str> {
        self.lookup_name
            .as_deref()
            .ok_or_else(|| RequestError::internal("lookup name is not prepared"))
    }

    /// Normalized identifier keying the negative cache and the coalescer.
    pub fn coalesce_key(&self) -> String {
        if let Some(name) = &self.lookup_name {
            return name.clone();
        }
        if let Some(parsed) = &self.parsed {
            return parsed.name.clone();
        }
        if let Some(id) = self.id {
            return id.to_string();
        }
        if let Some(filter) = &self.filter {
            return filter.clone();
        }
        if let Some(der) = &self.certificate {
            return hex_encode(der);
        }
        if let Some(sentinel) = self.sentinel {
            return sentinel.name().to_string();
        }
        // Enumeration has no identifier; one flight per (kind, domain).
        "*".to_string()
    }
}

/// Lowercase hex encoding, used to key certificate lookups.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Ordered records answering one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub records: Vec<IdentityRecord>,
    /// Domain that answered; `None` for well-known results and aggregates
    /// spanning domains.
    pub domain: Option<String>,
}

impl LookupResult {
    pub fn single(record: IdentityRecord) -> Self {
        Self {
            records: vec![record],
            domain: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of one domain attempt.
enum Attempt {
    /// A qualifying result; stop or aggregate per `search_all_domains`.
    Qualified(Vec<IdentityRecord>),
    /// Nothing usable here; advance to the next domain.
    Miss,
}

/// One sequential run of the state machine over the candidate domains.
pub(crate) struct CacheRequest<'e> {
    engine: &'e Engine,
    plugin: &'static dyn LookupPlugin,
    data: RequestData,
    pin: Option<String>,
    /// Set on the UPN-equivalent retry so it cannot recurse again.
    switched: bool,
}

impl<'e> CacheRequest<'e> {
    pub(crate) fn new(
        engine: &'e Engine,
        plugin: &'static dyn LookupPlugin,
        data: RequestData,
        pin: Option<String>,
    ) -> Self {
        Self {
            engine,
            plugin,
            data,
            pin,
            switched: false,
        }
    }

    pub(crate) async fn run(mut self) -> Result<LookupResult> {
        if let Some(record) = self.plugin.is_well_known(&self.data) {
            debug!(
                plugin = self.plugin.name(),
                name = %record.name,
                "request matches a well-known identity"
            );
            return Ok(LookupResult::single(record));
        }

        if self
            .plugin
            .global_ncache_check(self.engine.ncache(), &self.data)
        {
            debug!(
                plugin = self.plugin.name(),
                identifier = %self.data.coalesce_key(),
                "global negative cache hit"
            );
            return Err(RequestError::NotFound);
        }

        let mut aggregated: Vec<IdentityRecord> = Vec::new();
        let mut deferred: Option<RequestError> = None;

        let domains = self
            .engine
            .domains()
            .iterator(self.pin.as_deref(), self.plugin.get_next_domain_flags());

        for domain in domains {
            if self.skip_for_missing_fqn(&domain) {
                debug!(
                    plugin = self.plugin.name(),
                    domain = %domain.name,
                    "skipping domain requiring fully qualified names"
                );
                continue;
            }

            match self.attempt_domain(&domain).await {
                Ok(Attempt::Qualified(mut records)) => {
                    if self.plugin.only_one_result() {
                        records.truncate(1);
                    }
                    if !self.plugin.search_all_domains() {
                        return Ok(LookupResult {
                            records,
                            domain: Some(domain.name.clone()),
                        });
                    }
                    aggregated.extend(records);
                }
                Ok(Attempt::Miss) => {}
                Err(err @ RequestError::TransientBackend { .. }) => {
                    warn!(
                        plugin = self.plugin.name(),
                        domain = %domain.name,
                        error = %err,
                        "provider unavailable, advancing to next domain"
                    );
                    if self.plugin.only_one_result() || self.plugin.require_enumeration() {
                        return Err(err);
                    }
                    deferred = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        if !aggregated.is_empty() {
            if self.plugin.only_one_result() {
                aggregated.truncate(1);
            }
            return Ok(LookupResult {
                records: aggregated,
                domain: None,
            });
        }

        if !self.switched && self.plugin.allow_switch_to_upn() && self.upn_shaped() {
            if let Some(upn_kind) = self.plugin.upn_equivalent() {
                debug!(
                    plugin = self.plugin.name(),
                    upn_kind = %upn_kind,
                    "no result in any domain, retrying as UPN-equivalent kind"
                );
                let mut retry = self.engine.build_request(
                    upn_kind,
                    self.pin.as_deref(),
                    self.data.input.clone(),
                )?;
                retry.switched = true;
                let outcome = Box::pin(retry.run()).await;
                // A provider failure absorbed during the name pass still
                // outranks the retry coming up empty.
                return match (outcome, deferred) {
                    (Err(err), Some(pending)) if err.is_not_found() => Err(pending),
                    (outcome, _) => outcome,
                };
            }
        }

        match deferred {
            Some(err) => Err(err),
            None => {
                // Absent in every candidate domain; kinds with globally
                // scoped identifiers record that once, here.
                self.plugin
                    .global_ncache_add(self.engine.ncache(), &self.data);
                Err(RequestError::NotFound)
            }
        }
    }

    /// Domains insisting on fully qualified names are skipped for
    /// unqualified input, unless the plugin tolerates the missing qualifier.
    fn skip_for_missing_fqn(&self, domain: &DomainInfo) -> bool {
        domain.fully_qualified_names
            && self.plugin.parse_name()
            && self.pin.is_none()
            && !self.plugin.allow_missing_fqn()
    }

    /// A principal-name retry only applies to unqualified input shaped like
    /// `user@realm`; a plain short name can never be a UPN.
    fn upn_shaped(&self) -> bool {
        self.data
            .parsed
            .as_ref()
            .is_some_and(|p| p.domain.is_none() && p.name.contains('@'))
    }

    /// Steps 2-7 of the per-domain attempt: prepare, negative cache, cache
    /// lookup, freshness, coalesced dispatch, cache re-read.
    async fn attempt_domain(&mut self, domain: &Arc<DomainInfo>) -> Result<Attempt> {
        self.plugin
            .prepare_domain_data(&mut self.data, domain, self.engine.config())?;

        debug!(
            plugin = self.plugin.name(),
            domain = %domain.name,
            name = %self.plugin.create_debug_name(&self.data, domain),
            "domain attempt"
        );

        // A confirmed-absent marker always wins, even over bypass_cache;
        // its whole point is suppressing provider traffic.
        if self
            .plugin
            .ncache_check(self.engine.ncache(), domain, &self.data)
        {
            debug!(
                plugin = self.plugin.name(),
                domain = %domain.name,
                "negative cache hit"
            );
            return Ok(Attempt::Miss);
        }

        let now = OffsetDateTime::now_utc();
        let mut prior: Vec<IdentityRecord> = Vec::new();
        if !self.plugin.bypass_cache() {
            let records = self
                .plugin
                .lookup(self.engine.store(), &self.data, domain)
                .await?;
            if !records.is_empty() {
                if self.fresh(&records, now) {
                    debug!(
                        plugin = self.plugin.name(),
                        domain = %domain.name,
                        records = records.len(),
                        "cache hit, data is fresh"
                    );
                    return Ok(Attempt::Qualified(records));
                }
                // Stale data disambiguates the provider request below.
                prior = records;
            }
        }

        let params = self.plugin.dpreq_params(&self.data, &prior)?;
        let refresh = RefreshRequest {
            domain: domain.name.clone(),
            kind: self.plugin.provider_kind(),
            key: params.key,
            id: params.id,
            flag: params.flag,
        };
        let flight_key = (
            self.plugin.kind(),
            domain.name.clone(),
            self.data.coalesce_key(),
        );
        let provider = self.engine.provider();
        let outcome = self
            .engine
            .inflight()
            .submit(flight_key, async move { provider.refresh(refresh).await })
            .await;

        match outcome {
            Ok(RefreshStatus::Success) => {
                let records = self
                    .plugin
                    .lookup(self.engine.store(), &self.data, domain)
                    .await?;
                // Same qualifying decision as before dispatch, without
                // re-dispatching: bypass kinds take whatever the refresh
                // wrote, others still demand freshness.
                if !records.is_empty()
                    && (self.plugin.bypass_cache() || self.fresh(&records, now))
                {
                    Ok(Attempt::Qualified(records))
                } else {
                    Ok(Attempt::Miss)
                }
            }
            Ok(RefreshStatus::NotFound) => {
                debug!(
                    plugin = self.plugin.name(),
                    domain = %domain.name,
                    "provider confirmed absence"
                );
                self.plugin
                    .ncache_add(self.engine.ncache(), domain, &self.data);
                Ok(Attempt::Miss)
            }
            Err(ProviderError::Transient(message)) => {
                Err(RequestError::transient_backend(&domain.name, message))
            }
            Err(ProviderError::Fatal(message)) => Err(RequestError::fatal_backend(message)),
        }
    }

    /// A result set qualifies when any record's expiration attribute is
    /// still in the future.
    fn fresh(&self, records: &[IdentityRecord], now: OffsetDateTime) -> bool {
        let attr = self.plugin.expiration_attr();
        records.iter().any(|rec| rec.is_fresh(attr, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identra_core::ObjectType;

    #[test]
    fn test_request_data_from_inputs() {
        let start = OffsetDateTime::now_utc();
        let data = RequestData::new(LookupKind::UserById, RequestInput::id(1000), start);
        assert_eq!(data.id, Some(1000));
        assert_eq!(data.coalesce_key(), "1000");

        let data = RequestData::new(
            LookupKind::UserByFilter,
            RequestInput::filter("alice*"),
            start,
        );
        assert_eq!(data.filter.as_deref(), Some("alice*"));
        assert_eq!(data.raw_name(), Some("alice*"));
    }

    #[test]
    fn test_coalesce_key_prefers_prepared_name() {
        let start = OffsetDateTime::now_utc();
        let mut data = RequestData::new(
            LookupKind::UserByName,
            RequestInput::name("Alice"),
            start,
        );
        data.parsed = Some(ParsedName::unqualified("Alice"));
        assert_eq!(data.coalesce_key(), "Alice");

        data.lookup_name = Some("alice".to_string());
        assert_eq!(data.coalesce_key(), "alice");
    }

    #[test]
    fn test_missing_preconditions_are_internal_errors() {
        let data = RequestData::new(
            LookupKind::UserByName,
            RequestInput::name("alice"),
            OffsetDateTime::now_utc(),
        );
        assert!(matches!(
            data.parsed_name(),
            Err(RequestError::Internal(_))
        ));
        assert!(matches!(
            data.lookup_name(),
            Err(RequestError::Internal(_))
        ));
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x30, 0x82, 0x01, 0xff]), "308201ff");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_lookup_result_single() {
        let result = LookupResult::single(IdentityRecord::new(ObjectType::User, "nobody", 65534));
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert_eq!(result.domain, None);
    }
}
