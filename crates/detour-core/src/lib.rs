//! Core types and traits for Detour redirects.
//!
//! This crate provides the redirect record, the path normalizer and the
//! store contracts shared by the storage backends and the resolver.

pub mod error;
pub mod path;
pub mod record;
pub mod site;
pub mod store;

pub use error::{PathError, Result, StorageError};
pub use path::{normalize_base, normalize_query, normalize_to, FromPath};
pub use record::{RedirectKey, RedirectRecord};
pub use site::{SiteId, SiteScope};
pub use store::{ReadStore, RedirectFilter, RedirectStore, WriteMode};
