use crate::kinds::ObjectType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Well-known cache attribute names carried in a record's attribute map.
pub mod attrs {
    /// Unix seconds of the last authoritative refresh.
    pub const LAST_UPDATE: &str = "lastUpdate";
    /// Unix seconds after which the record is considered stale.
    pub const CACHE_EXPIRE: &str = "dataExpireTimestamp";
    /// Unix seconds after which cached membership data is considered stale.
    pub const INITGR_EXPIRE: &str = "initgrExpireTimestamp";
}

/// One cached identity record as handed back by the cache store.
///
/// Typed fields cover what the engine itself inspects; everything else the
/// store knows about an identity travels in the attribute map, including the
/// expiration attributes a plugin names via `expiration_attr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub object_type: ObjectType,
    pub name: String,
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub upn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub certificate: Option<Vec<u8>>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl IdentityRecord {
    pub fn new(object_type: ObjectType, name: impl Into<String>, id: u32) -> Self {
        Self {
            object_type,
            name: name.into(),
            id,
            upn: None,
            certificate: None,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_upn(mut self, upn: impl Into<String>) -> Self {
        self.upn = Some(upn.into());
        self
    }

    pub fn with_certificate(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.certificate = Some(der.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Stamps `lastUpdate` and `dataExpireTimestamp` relative to `now`.
    pub fn stamp(mut self, now: OffsetDateTime, lifetime: std::time::Duration) -> Self {
        let now_ts = now.unix_timestamp();
        let expire = now_ts + lifetime.as_secs() as i64;
        self.attrs
            .insert(attrs::LAST_UPDATE.to_string(), now_ts.to_string());
        self.attrs
            .insert(attrs::CACHE_EXPIRE.to_string(), expire.to_string());
        self
    }

    /// Reads a numeric attribute, if present and well-formed.
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        self.attrs.get(key).and_then(|v| v.parse().ok())
    }

    /// Unix seconds of the last authoritative refresh, if recorded.
    pub fn last_update(&self) -> Option<i64> {
        self.attr_i64(attrs::LAST_UPDATE)
    }

    /// Whether the expiration attribute named by `attr` is still in the
    /// future at `now`. A record with no such attribute is never fresh.
    pub fn is_fresh(&self, attr: &str, now: OffsetDateTime) -> bool {
        match self.attr_i64(attr) {
            Some(expire) => expire > now.unix_timestamp(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record() -> IdentityRecord {
        IdentityRecord::new(ObjectType::User, "alice", 1000)
    }

    #[test]
    fn test_stamped_record_is_fresh() {
        let now = OffsetDateTime::now_utc();
        let rec = record().stamp(now, Duration::from_secs(300));
        assert!(rec.is_fresh(attrs::CACHE_EXPIRE, now));
        assert_eq!(rec.last_update(), Some(now.unix_timestamp()));
    }

    #[test]
    fn test_expired_record_is_stale() {
        let now = OffsetDateTime::now_utc();
        let rec = record().stamp(now - time::Duration::seconds(600), Duration::from_secs(300));
        assert!(!rec.is_fresh(attrs::CACHE_EXPIRE, now));
    }

    #[test]
    fn test_missing_expiration_attr_is_stale() {
        let now = OffsetDateTime::now_utc();
        assert!(!record().is_fresh(attrs::CACHE_EXPIRE, now));
    }

    #[test]
    fn test_malformed_attr_ignored() {
        let rec = record().with_attr(attrs::CACHE_EXPIRE, "soon");
        assert_eq!(rec.attr_i64(attrs::CACHE_EXPIRE), None);
        assert!(!rec.is_fresh(attrs::CACHE_EXPIRE, OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_builder_fields() {
        let rec = record()
            .with_upn("alice@corp.example.com")
            .with_certificate(vec![0x30, 0x82]);
        assert_eq!(rec.upn.as_deref(), Some("alice@corp.example.com"));
        assert_eq!(rec.certificate.as_deref(), Some(&[0x30, 0x82][..]));
    }
}
