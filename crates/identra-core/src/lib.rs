pub mod error;
pub mod kinds;
pub mod name;
pub mod record;
pub mod time;
pub mod well_known;

pub use error::{CoreError, ErrorCategory, Result};
pub use kinds::{LookupKind, ObjectType, RequestInput};
pub use name::{cased_name, parse_qualified, replace_space, reverse_replace_space, ParsedName};
pub use record::{attrs, IdentityRecord};
pub use time::{from_unix_timestamp, now_utc, unix_now};
pub use well_known::{well_known_by_id, well_known_by_name, WellKnownId};
