//! Redirect lookup service.
//!
//! [`ResolverService`] turns an incoming request path into an exact store
//! lookup and returns the destination, if any. [`Importer`] bulk-loads
//! redirects from JSON lines.
//!
//! # Example
//!
//! ```rust
//! use detour_core::{RedirectRecord, SiteScope};
//! use detour_resolver::ResolverService;
//! use detour_storage::{InMemoryRedirectStore, RedirectStore, WriteMode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryRedirectStore::new();
//! store
//!     .put(RedirectRecord::new("/about-us.html", "/about")?, WriteMode::Create)
//!     .await?;
//!
//! let service = ResolverService::new(store);
//! if let Some(resolution) = service.resolve("/about-us.html", SiteScope::Global).await? {
//!     println!("Redirect to: {}", resolution.to);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod import;
pub mod resolver;
pub mod service;

pub use error::{ResolveError, Result};
pub use import::{ImportError, ImportOutcome, ImportPolicy, ImportReport, Importer};
pub use resolver::{Resolution, Resolver};
pub use service::{ResolverConfig, ResolverService};
