//! Reserved sentinel identities resolved without cache or backend access.

use crate::kinds::ObjectType;
use crate::record::IdentityRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of well-known identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellKnownId {
    /// The overflow user, uid 65534.
    Nobody,
    /// The overflow group, gid 65534.
    Nogroup,
}

impl WellKnownId {
    pub const ALL: &[WellKnownId] = &[WellKnownId::Nobody, WellKnownId::Nogroup];

    pub fn name(&self) -> &'static str {
        match self {
            WellKnownId::Nobody => "nobody",
            WellKnownId::Nogroup => "nogroup",
        }
    }

    pub fn numeric_id(&self) -> u32 {
        match self {
            WellKnownId::Nobody | WellKnownId::Nogroup => 65534,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            WellKnownId::Nobody => ObjectType::User,
            WellKnownId::Nogroup => ObjectType::Group,
        }
    }

    /// Builds the canned record for this sentinel. Carries no expiration
    /// attributes; it never passes through the freshness check.
    pub fn record(&self) -> IdentityRecord {
        IdentityRecord::new(self.object_type(), self.name(), self.numeric_id())
    }
}

impl fmt::Display for WellKnownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Looks up a sentinel by name for the given object class.
pub fn well_known_by_name(name: &str, object_type: ObjectType) -> Option<WellKnownId> {
    WellKnownId::ALL
        .iter()
        .copied()
        .find(|w| w.object_type() == object_type && w.name() == name)
}

/// Looks up a sentinel by numeric id for the given object class.
pub fn well_known_by_id(id: u32, object_type: ObjectType) -> Option<WellKnownId> {
    WellKnownId::ALL
        .iter()
        .copied()
        .find(|w| w.object_type() == object_type && w.numeric_id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(
            well_known_by_name("nobody", ObjectType::User),
            Some(WellKnownId::Nobody)
        );
        assert_eq!(well_known_by_name("nobody", ObjectType::Group), None);
        assert_eq!(well_known_by_name("alice", ObjectType::User), None);
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(
            well_known_by_id(65534, ObjectType::Group),
            Some(WellKnownId::Nogroup)
        );
        assert_eq!(well_known_by_id(1000, ObjectType::User), None);
    }

    #[test]
    fn test_canned_record() {
        let rec = WellKnownId::Nobody.record();
        assert_eq!(rec.name, "nobody");
        assert_eq!(rec.id, 65534);
        assert_eq!(rec.object_type, ObjectType::User);
        assert!(rec.attrs.is_empty());
    }
}
