//! The provider-backend trait: the authoritative source a stale or missing
//! identity is refreshed from.

use async_trait::async_trait;
use std::fmt;

use crate::error::ProviderError;

/// Request class a refresh is issued under, the provider-side analogue of a
/// lookup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderRequestKind {
    User,
    Group,
    WildcardUser,
    WildcardGroup,
    UserByCert,
    EnumUsers,
    EnumGroups,
}

impl fmt::Display for ProviderRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderRequestKind::User => "user",
            ProviderRequestKind::Group => "group",
            ProviderRequestKind::WildcardUser => "wildcard-user",
            ProviderRequestKind::WildcardGroup => "wildcard-group",
            ProviderRequestKind::UserByCert => "user-by-cert",
            ProviderRequestKind::EnumUsers => "enum-users",
            ProviderRequestKind::EnumGroups => "enum-groups",
        };
        write!(f, "{name}")
    }
}

/// Parameters of one refresh call, derived by the plugin that owns the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub domain: String,
    pub kind: ProviderRequestKind,
    /// Identifier string: a normalized name, a filter, or a hex-encoded
    /// certificate, depending on `kind`.
    pub key: Option<String>,
    pub id: Option<u32>,
    /// Free-form provider flag, e.g. a lookup scope hint.
    pub flag: Option<String>,
}

impl RefreshRequest {
    pub fn new(domain: impl Into<String>, kind: ProviderRequestKind) -> Self {
        Self {
            domain: domain.into(),
            kind,
            key: None,
            id: None,
            flag: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }
}

/// Terminal status of a successful refresh call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// The provider answered and the cache store now holds current data.
    Success,
    /// The provider confirmed the identity does not exist.
    NotFound,
}

/// The outcome a coalesced refresh fans out to its waiters.
pub type RefreshOutcome = Result<RefreshStatus, ProviderError>;

/// Authoritative identity source consumed by the lookup engine.
///
/// A refresh writes current data into the cache store as a side effect; the
/// engine re-reads the store afterwards rather than consuming records from
/// the provider directly.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    async fn refresh(&self, request: RefreshRequest) -> RefreshOutcome;

    /// Returns the name of this provider for logging/debugging.
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that ProviderBackend is object-safe
    fn _assert_provider_object_safe(_: &dyn ProviderBackend) {}

    #[test]
    fn test_refresh_request_builder() {
        let req = RefreshRequest::new("corp.example.com", ProviderRequestKind::User)
            .with_key("alice")
            .with_id(1000);
        assert_eq!(req.domain, "corp.example.com");
        assert_eq!(req.key.as_deref(), Some("alice"));
        assert_eq!(req.id, Some(1000));
        assert_eq!(req.flag, None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ProviderRequestKind::WildcardUser.to_string(), "wildcard-user");
        assert_eq!(ProviderRequestKind::EnumGroups.to_string(), "enum-groups");
    }
}
