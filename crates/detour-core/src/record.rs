use crate::error::PathError;
use crate::path::{normalize_to, FromPath};
use crate::site::SiteScope;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The unique key of a redirect within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RedirectKey {
    pub site: SiteScope,
    pub from: FromPath,
}

impl RedirectKey {
    pub fn new(site: SiteScope, from: FromPath) -> Self {
        Self { site, from }
    }
}

impl Display for RedirectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.from, self.site)
    }
}

/// A stored redirect.
///
/// Fields are only reachable through the normalizing constructors, so a
/// record always holds a normalized "from" path and destination. The serde
/// representation is the flat row `{"from", "to", "locale", "site"}` and is
/// normalized again on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRedirect")]
pub struct RedirectRecord {
    from: FromPath,
    to: String,
    locale: Option<String>,
    site: SiteScope,
}

impl RedirectRecord {
    /// Creates a global-scope record from raw "from" and "to" strings.
    pub fn new(from: &str, to: &str) -> Result<Self, PathError> {
        Ok(Self {
            from: FromPath::parse(from)?,
            to: normalize_to(to)?,
            locale: None,
            site: SiteScope::Global,
        })
    }

    /// Creates a record from an already normalized "from" path.
    pub fn with_from(from: FromPath, to: &str) -> Result<Self, PathError> {
        Ok(Self {
            from,
            to: normalize_to(to)?,
            locale: None,
            site: SiteScope::Global,
        })
    }

    /// Sets the locale tag. An empty tag clears it.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        self.locale = (!locale.is_empty()).then_some(locale);
        self
    }

    pub fn with_site(mut self, site: impl Into<SiteScope>) -> Self {
        self.site = site.into();
        self
    }

    /// Replaces the destination, normalizing it.
    pub fn set_to(&mut self, to: &str) -> Result<(), PathError> {
        self.to = normalize_to(to)?;
        Ok(())
    }

    pub fn from_path(&self) -> &FromPath {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn site(&self) -> SiteScope {
        self.site
    }

    pub fn key(&self) -> RedirectKey {
        RedirectKey::new(self.site, self.from.clone())
    }
}

#[derive(Deserialize)]
struct RawRedirect {
    from: String,
    to: String,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    site: Option<u64>,
}

impl TryFrom<RawRedirect> for RedirectRecord {
    type Error = PathError;

    fn try_from(raw: RawRedirect) -> Result<Self, Self::Error> {
        let record = RedirectRecord::new(&raw.from, &raw.to)?.with_site(SiteScope::from(raw.site));
        Ok(match raw.locale {
            Some(locale) => record.with_locale(locale),
            None => record,
        })
    }
}
