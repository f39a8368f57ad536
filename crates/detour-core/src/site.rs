use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::NonZeroU64;

/// Identifier of a site (tenant) that owns a set of redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(NonZeroU64);

impl SiteId {
    /// Returns `None` for `0`, which is reserved for the global scope.
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The partition a redirect belongs to.
///
/// Every store key includes the scope, so the same "from" path may point to
/// different destinations on different sites. Raw id `0` (the main site)
/// maps to [`SiteScope::Global`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum SiteScope {
    #[default]
    Global,
    Site(SiteId),
}

impl SiteScope {
    pub fn from_raw(id: u64) -> Self {
        SiteId::new(id).map_or(Self::Global, Self::Site)
    }

    /// Returns the raw site id, or `None` for the global scope.
    pub fn as_raw(&self) -> Option<u64> {
        match self {
            SiteScope::Global => None,
            SiteScope::Site(id) => Some(id.get()),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, SiteScope::Global)
    }
}

impl From<Option<u64>> for SiteScope {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Global, Self::from_raw)
    }
}

impl From<SiteScope> for Option<u64> {
    fn from(value: SiteScope) -> Self {
        value.as_raw()
    }
}

impl From<SiteId> for SiteScope {
    fn from(value: SiteId) -> Self {
        Self::Site(value)
    }
}

impl Display for SiteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteScope::Global => f.write_str("global"),
            SiteScope::Site(id) => write!(f, "site:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_global() {
        assert_eq!(SiteScope::from_raw(0), SiteScope::Global);
        assert_eq!(SiteScope::from(Some(0)), SiteScope::Global);
        assert_eq!(SiteScope::from(None), SiteScope::Global);
        assert!(SiteId::new(0).is_none());
    }

    #[test]
    fn raw_round_trip() {
        let scope = SiteScope::from_raw(7);
        assert_eq!(scope.as_raw(), Some(7));
        assert!(!scope.is_global());
        assert_eq!(SiteScope::Global.as_raw(), None);
    }

    #[test]
    fn display() {
        assert_eq!(SiteScope::Global.to_string(), "global");
        assert_eq!(SiteScope::from_raw(3).to_string(), "site:3");
    }

    #[test]
    fn serde_as_optional_id() {
        assert_eq!(serde_json::to_string(&SiteScope::from_raw(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&SiteScope::Global).unwrap(), "null");
        let scope: SiteScope = serde_json::from_str("0").unwrap();
        assert_eq!(scope, SiteScope::Global);
    }
}
