use crate::error::Result;
use crate::path::FromPath;
use crate::record::RedirectRecord;
use crate::site::SiteScope;
use async_trait::async_trait;

/// How [`RedirectStore::put`] treats an existing record with the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `DuplicateKey` if the key is taken.
    #[default]
    Create,
    /// Insert or replace.
    Overwrite,
}

/// Administrative search over stored redirects.
///
/// `text` is matched case-insensitively as a substring of the "from" base,
/// the "from" query and the destination. `site` restricts results to one
/// scope.
#[derive(Debug, Clone, Default)]
pub struct RedirectFilter {
    pub text: Option<String>,
    pub site: Option<SiteScope>,
}

impl RedirectFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            site: None,
        }
    }

    pub fn in_site(mut self, site: SiteScope) -> Self {
        self.site = Some(site);
        self
    }

    pub fn matches(&self, record: &RedirectRecord) -> bool {
        if self.site.is_some_and(|site| site != record.site()) {
            return false;
        }

        let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = text.to_lowercase();
        let from = record.from_path();

        [Some(from.base()), from.query(), Some(record.to())]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Read access to stored redirects.
///
/// This is all the lookup path needs, so request-serving code can be handed
/// a store without write access.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Returns the record stored under exactly `(site, from)`.
    ///
    /// A `from` without a query only matches records without a query.
    /// Returns `Ok(None)` if there is no such record.
    async fn find_exact(&self, site: SiteScope, from: &FromPath) -> Result<Option<RedirectRecord>>;

    /// Returns every stored record ordered by site, base and query.
    async fn list(&self) -> Result<Vec<RedirectRecord>>;

    /// Returns the records matching `filter`, in [`ReadStore::list`] order.
    async fn search(&self, filter: &RedirectFilter) -> Result<Vec<RedirectRecord>> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }
}

#[async_trait]
pub trait RedirectStore: ReadStore {
    /// Stores a record under its key.
    ///
    /// Returns `Err(DuplicateKey)` if the key exists and `mode` is
    /// [`WriteMode::Create`].
    async fn put(&self, record: RedirectRecord, mode: WriteMode) -> Result<()>;

    /// Deletes the record stored under `(site, from)`.
    ///
    /// Returns `Err(NotFound)` if there is no such record.
    async fn remove(&self, site: SiteScope, from: &FromPath) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str) -> RedirectRecord {
        RedirectRecord::new(from, to).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RedirectFilter::default();
        assert!(filter.matches(&record("/a", "/b")));
        assert!(RedirectFilter::text("").matches(&record("/a", "/b")));
    }

    #[test]
    fn text_matches_searchable_fields() {
        let rec = record("/Shop/Items?Page=2", "/store");

        assert!(RedirectFilter::text("shop").matches(&rec));
        assert!(RedirectFilter::text("page=2").matches(&rec));
        assert!(RedirectFilter::text("STORE").matches(&rec));
        assert!(!RedirectFilter::text("checkout").matches(&rec));
    }

    #[test]
    fn site_filter_is_exact() {
        let rec = record("/a", "/b").with_site(SiteScope::from_raw(2));

        assert!(RedirectFilter::default()
            .in_site(SiteScope::from_raw(2))
            .matches(&rec));
        assert!(!RedirectFilter::default()
            .in_site(SiteScope::Global)
            .matches(&rec));
        assert!(!RedirectFilter::text("/b")
            .in_site(SiteScope::from_raw(3))
            .matches(&rec));
    }
}
