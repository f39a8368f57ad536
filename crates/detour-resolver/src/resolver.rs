use crate::Result;
use async_trait::async_trait;
use detour_core::{RedirectRecord, SiteScope};
use serde::Serialize;

/// Where a request should be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The normalized destination path or URL.
    pub to: String,
    /// The locale tag stored with the redirect, if any.
    pub locale: Option<String>,
}

impl From<RedirectRecord> for Resolution {
    fn from(record: RedirectRecord) -> Self {
        Self {
            to: record.to().to_string(),
            locale: record.locale().map(str::to_string),
        }
    }
}

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a request path to its redirect destination.
    /// Returns `None` if no redirect is stored for the path.
    async fn resolve(&self, request_path: &str, site: SiteScope) -> Result<Option<Resolution>>;
}
