//! # identra-store
//!
//! Interface crate for the two external collaborators of the identra lookup
//! engine. It defines traits and types only; implementations live in
//! separate crates.
//!
//! ## Overview
//!
//! - [`IdentityStore`] is the persistent identity cache: query by name, id,
//!   filter or certificate, enumerate a domain, and write refreshed records
//!   back. Reads never trigger a backend call.
//! - [`ProviderBackend`] is the authoritative data provider: an asynchronous
//!   "refresh this identity" call that reports success, not-found, or a
//!   transient/fatal failure.
//!
//! ## Example
//!
//! ```ignore
//! use identra_store::{IdentityStore, StoreError};
//! use identra_core::{IdentityRecord, ObjectType};
//!
//! async fn find_user(
//!     store: &dyn IdentityStore,
//!     domain: &str,
//!     name: &str,
//! ) -> Result<Option<IdentityRecord>, StoreError> {
//!     let mut records = store.lookup_by_name(domain, ObjectType::User, name).await?;
//!     Ok(records.pop())
//! }
//! ```

mod error;
mod provider;
mod traits;

pub use error::{ProviderError, StoreError};
pub use provider::{
    ProviderBackend, ProviderRequestKind, RefreshOutcome, RefreshRequest, RefreshStatus,
};
pub use traits::IdentityStore;

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for a shared store trait object.
pub type DynStore = std::sync::Arc<dyn IdentityStore>;

/// Type alias for a shared provider trait object.
pub type DynProvider = std::sync::Arc<dyn ProviderBackend>;
