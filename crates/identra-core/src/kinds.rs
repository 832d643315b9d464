use crate::well_known::WellKnownId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of identity object a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    User,
    Group,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::User => write!(f, "user"),
            ObjectType::Group => write!(f, "group"),
        }
    }
}

/// Tag selecting which plugin handles a request.
///
/// Every kind maps to exactly one plugin registered at startup; there is no
/// dynamic dispatch by string beyond this initial selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    UserByName,
    UserByUpn,
    UserById,
    UserByCert,
    UserByFilter,
    GroupByName,
    GroupById,
    GroupByFilter,
    EnumUsers,
    EnumGroups,
    WellKnown,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::UserByName => "user-by-name",
            LookupKind::UserByUpn => "user-by-upn",
            LookupKind::UserById => "user-by-id",
            LookupKind::UserByCert => "user-by-cert",
            LookupKind::UserByFilter => "user-by-filter",
            LookupKind::GroupByName => "group-by-name",
            LookupKind::GroupById => "group-by-id",
            LookupKind::GroupByFilter => "group-by-filter",
            LookupKind::EnumUsers => "enum-users",
            LookupKind::EnumGroups => "enum-groups",
            LookupKind::WellKnown => "well-known",
        };
        write!(f, "{name}")
    }
}

/// Typed input a request is constructed from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestInput {
    Name { name: String, id_hint: Option<u32> },
    Id { id: u32 },
    Filter { filter: String },
    Certificate { der: Vec<u8> },
    Sentinel { id: WellKnownId },
    Enumeration,
}

impl RequestInput {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            id_hint: None,
        }
    }

    pub fn id(id: u32) -> Self {
        Self::Id { id }
    }

    pub fn filter(filter: impl Into<String>) -> Self {
        Self::Filter {
            filter: filter.into(),
        }
    }

    pub fn certificate(der: impl Into<Vec<u8>>) -> Self {
        Self::Certificate { der: der.into() }
    }

    pub fn sentinel(id: WellKnownId) -> Self {
        Self::Sentinel { id }
    }
}
