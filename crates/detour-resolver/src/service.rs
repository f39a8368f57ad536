use std::sync::Arc;

use crate::resolver::{Resolution, Resolver};
use async_trait::async_trait;
use detour_core::{FromPath, ReadStore, RedirectRecord, SiteScope};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Lookup behaviour of a [`ResolverService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ResolverConfig {
    /// Retry a miss in a specific site against the global scope.
    #[builder(default = false)]
    pub global_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Service for resolving request paths to redirect destinations.
///
/// Uses a read-only store; lookups are exact on `(site, base, query)`.
#[derive(Debug, Clone)]
pub struct ResolverService<S> {
    store: Arc<S>,
    config: ResolverConfig,
}

impl<S: ReadStore> ResolverService<S> {
    /// Creates a new ResolverService with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    pub fn with_config(store: S, config: ResolverConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Creates a service over a store that is also used elsewhere, e.g. by
    /// an administrative writer.
    pub fn from_shared(store: Arc<S>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a request path to its destination.
    ///
    /// # Arguments
    ///
    /// * `request_path` - The raw request path, optionally with a query string
    /// * `site` - The scope the request was received in
    ///
    /// # Returns
    ///
    /// * `Ok(Some(resolution))` - The destination and locale of the redirect
    /// * `Ok(None)` - If no redirect is stored for the path
    /// * `Err(InvalidPath)` - If `request_path` is empty
    /// * `Err(Storage)` - If there was an error accessing the store
    pub async fn resolve(
        &self,
        request_path: &str,
        site: SiteScope,
    ) -> crate::Result<Option<Resolution>> {
        Resolver::resolve(self, request_path, site).await
    }

    /// Returns the record stored for a raw "from" string in exactly `site`.
    ///
    /// Unlike [`ResolverService::resolve`] this never falls back to the
    /// global scope, which makes it suitable for deciding between create and
    /// update when loading redirects.
    pub async fn find_by_from(
        &self,
        raw: &str,
        site: SiteScope,
    ) -> crate::Result<Option<RedirectRecord>> {
        let from = FromPath::parse(raw)?;
        Ok(self.store.find_exact(site, &from).await?)
    }

    async fn lookup(&self, from: &FromPath, site: SiteScope) -> crate::Result<Option<RedirectRecord>> {
        if let Some(record) = self.store.find_exact(site, from).await? {
            return Ok(Some(record));
        }

        if self.config.global_fallback && !site.is_global() {
            trace!(from = %from, site = %site, "retrying in global scope");
            return Ok(self.store.find_exact(SiteScope::Global, from).await?);
        }

        Ok(None)
    }
}

#[async_trait]
impl<S: ReadStore> Resolver for ResolverService<S> {
    async fn resolve(
        &self,
        request_path: &str,
        site: SiteScope,
    ) -> crate::Result<Option<Resolution>> {
        trace!(path = %request_path, site = %site, "resolving request path");

        let from = FromPath::parse(request_path)?;

        match self.lookup(&from, site).await? {
            Some(record) => {
                debug!(from = %from, site = %site, to = %record.to(), "resolved redirect");
                Ok(Some(record.into()))
            }
            None => {
                trace!(from = %from, site = %site, "no redirect for path");
                Ok(None)
            }
        }
    }
}
