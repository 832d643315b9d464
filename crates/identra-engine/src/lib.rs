//! Domain-aware identity lookup engine.
//!
//! The engine answers identity lookups (users, groups, enumerations,
//! certificate matches) against a cache store backed by a remote provider.
//! Each lookup kind is handled by a plugin that knows how to parse input,
//! query the store, and describe the refresh request sent to the provider
//! when cached data is missing or stale.
//!
//! Cross-cutting machinery lives alongside the plugins: an ordered domain
//! iterator, a negative cache for confirmed misses, and an in-flight table
//! that coalesces identical concurrent provider refreshes.

pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod inflight;
pub mod ncache;
pub mod plugin;
pub mod plugins;
pub mod request;

pub use config::EngineConfig;
pub use domains::{DomainFlags, DomainInfo, DomainIterator, DomainSet};
pub use engine::Engine;
pub use error::{ErrorCategory, RequestError, Result};
pub use inflight::{FlightKey, InflightTable};
pub use ncache::NegativeCache;
pub use plugin::{plugin_for, LookupPlugin, ProviderParams};
pub use request::{LookupResult, RequestData};
