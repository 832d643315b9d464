//! Concrete lookup plugins, one per [`LookupKind`](identra_core::LookupKind).

mod enumeration;
mod group_by_filter;
mod group_by_id;
mod group_by_name;
mod user_by_cert;
mod user_by_filter;
mod user_by_id;
mod user_by_name;
mod user_by_upn;
mod well_known;

pub use enumeration::{EnumGroupsPlugin, EnumUsersPlugin};
pub use group_by_filter::GroupByFilterPlugin;
pub use group_by_id::GroupByIdPlugin;
pub use group_by_name::GroupByNamePlugin;
pub use user_by_cert::UserByCertPlugin;
pub use user_by_filter::UserByFilterPlugin;
pub use user_by_id::UserByIdPlugin;
pub use user_by_name::UserByNamePlugin;
pub use user_by_upn::UserByUpnPlugin;
pub use well_known::WellKnownPlugin;

use identra_core::{cased_name, reverse_replace_space};

use crate::config::EngineConfig;
use crate::domains::DomainInfo;
use crate::error::Result;
use crate::request::RequestData;

/// Rewrites the lookup key for the current domain: the parsed name, case
/// folded per the domain's rule, with the override character turned back
/// into spaces.
pub(crate) fn prepare_name_key(
    data: &mut RequestData,
    domain: &DomainInfo,
    config: &EngineConfig,
) -> Result<()> {
    let parsed = data.parsed_name()?;
    let cased = cased_name(&parsed.name, domain.case_sensitive);
    data.lookup_name = Some(reverse_replace_space(&cased, config.override_space));
    Ok(())
}
