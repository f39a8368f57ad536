use crate::error::PathError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Characters stripped from the end of bases and destinations.
const TRAILING: [char; 2] = ['/', '?'];
const ROOT: &str = "/";

/// The normalized "from" side of a redirect: a path base plus an optional
/// query string.
///
/// A `FromPath` can only be built through the normalizer, so the base always
/// starts with `/`, never ends with `/` (unless it is the root) and never ends
/// with `?`. The query, when present, is non-empty and has no trailing `?`.
///
/// # Examples
///
/// ```
/// use detour_core::FromPath;
///
/// let from = FromPath::parse("about-us/").unwrap();
/// assert_eq!(from.base(), "/about-us");
/// assert_eq!(from.query(), None);
///
/// let from = FromPath::parse("/page?page=1&num=5").unwrap();
/// assert_eq!(from.query(), Some("page=1&num=5"));
/// assert_eq!(from.to_string(), "/page?page=1&num=5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FromPath {
    base: String,
    query: Option<String>,
}

impl FromPath {
    /// Splits a raw "from" string on its first `?` and normalizes both halves.
    ///
    /// Fails with [`PathError::InvalidPath`] if `raw` is empty.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(empty_path());
        }

        let (base, query) = match raw.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (raw, None),
        };

        Ok(Self {
            base: base_of(base),
            query: query.and_then(normalize_query),
        })
    }

    /// Builds a `FromPath` from a separately supplied base and query string.
    ///
    /// The base must be non-empty and must not carry its own query string.
    pub fn from_parts(base: &str, query: Option<&str>) -> Result<Self, PathError> {
        if base.contains('?') {
            return Err(PathError::InvalidPath(format!(
                "base must not contain a query string: '{}'",
                base
            )));
        }

        Ok(Self {
            base: normalize_base(base)?,
            query: query.and_then(normalize_query),
        })
    }

    /// Returns the normalized path base.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the normalized query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl Display for FromPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.base, query),
            None => f.write_str(&self.base),
        }
    }
}

impl FromStr for FromPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FromPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FromPath> for String {
    fn from(value: FromPath) -> Self {
        value.to_string()
    }
}

/// Normalizes a path base.
///
/// Prepends `/` when missing and strips trailing `/` and `?`. The root `/` is
/// preserved, and a base made only of those characters collapses to it.
pub fn normalize_base(raw: &str) -> Result<String, PathError> {
    if raw.is_empty() {
        return Err(empty_path());
    }
    Ok(base_of(raw))
}

/// Normalizes a query string, returning `None` when nothing is left after
/// stripping trailing `?`.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches('?');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalizes a redirect destination.
///
/// Strips trailing `?` and `/`; the root `/` is preserved. Embedded query
/// content is left untouched.
pub fn normalize_to(raw: &str) -> Result<String, PathError> {
    if raw.is_empty() {
        return Err(PathError::InvalidPath(
            "destination must not be empty".to_string(),
        ));
    }

    let trimmed = raw.trim_end_matches(TRAILING);
    if trimmed.is_empty() {
        return Ok(ROOT.to_string());
    }
    Ok(trimmed.to_string())
}

// The base may legitimately be empty here, e.g. for "?page=1".
fn base_of(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(TRAILING);
    if trimmed.is_empty() {
        return ROOT.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn empty_path() -> PathError {
    PathError::InvalidPath("path must not be empty".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "/",
        "//",
        "?",
        "??",
        "about-us/",
        "/about-us.html",
        "/about-us.html?",
        "/about-us/?",
        "/page?page=1&num=5",
        "/page?page=1&num=5?",
        "page/?a=b?c",
        "/a//b//",
        "?x=1",
        "/shop/items?",
    ];

    fn parse(raw: &str) -> FromPath {
        FromPath::parse(raw).unwrap()
    }

    #[test]
    fn leading_slash_added_and_trailing_slash_stripped() {
        let from = parse("about-us/");
        assert_eq!(from.base(), "/about-us");
        assert_eq!(from.query(), None);
    }

    #[test]
    fn root_is_preserved() {
        assert_eq!(parse("/").base(), "/");
        assert_eq!(parse("//").base(), "/");
        assert_eq!(normalize_base("/").unwrap(), "/");
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(matches!(
            FromPath::parse(""),
            Err(PathError::InvalidPath(_))
        ));
        assert!(normalize_base("").is_err());
        assert!(normalize_to("").is_err());
    }

    #[test]
    fn splits_on_first_question_mark() {
        let from = parse("/page?a=1?b=2");
        assert_eq!(from.base(), "/page");
        assert_eq!(from.query(), Some("a=1?b=2"));
    }

    #[test]
    fn trailing_question_mark_means_no_query() {
        let from = parse("/about-us.html?");
        assert_eq!(from.base(), "/about-us.html");
        assert_eq!(from.query(), None);

        assert_eq!(parse("/about??").query(), None);
    }

    #[test]
    fn query_only_input_maps_to_root() {
        let from = parse("?x=1");
        assert_eq!(from.base(), "/");
        assert_eq!(from.query(), Some("x=1"));
    }

    #[test]
    fn query_keeps_inner_content() {
        assert_eq!(normalize_query("page=1&num=5?"), Some("page=1&num=5".to_string()));
        assert_eq!(normalize_query("?"), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn destination_normalization() {
        assert_eq!(normalize_to("/about/").unwrap(), "/about");
        assert_eq!(normalize_to("/about?").unwrap(), "/about");
        assert_eq!(normalize_to("/about/?").unwrap(), "/about");
        assert_eq!(normalize_to("/about?/").unwrap(), "/about");
        assert_eq!(normalize_to("/").unwrap(), "/");
        assert_eq!(
            normalize_to("/about?something=5").unwrap(),
            "/about?something=5"
        );
        assert_eq!(
            normalize_to("https://example.com/").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn from_parts_matches_parse() {
        let joined = parse("/page?page=1");
        let parts = FromPath::from_parts("page/", Some("page=1?")).unwrap();
        assert_eq!(joined, parts);
    }

    #[test]
    fn from_parts_rejects_query_in_base() {
        assert!(FromPath::from_parts("/page?x=1", None).is_err());
        assert!(FromPath::from_parts("", None).is_err());
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in SAMPLES {
            let once = parse(raw);
            let twice = parse(&once.to_string());
            assert_eq!(once, twice, "input: {raw:?}");

            let base = normalize_base(once.base()).unwrap();
            assert_eq!(base, once.base(), "input: {raw:?}");

            let to = normalize_to(raw).unwrap();
            assert_eq!(normalize_to(&to).unwrap(), to, "input: {raw:?}");
        }
    }

    #[test]
    fn display_reconstructs_from_string() {
        assert_eq!(parse("/about-us.html").to_string(), "/about-us.html");
        assert_eq!(parse("page/?page=1&num=5").to_string(), "/page?page=1&num=5");
    }

    #[test]
    fn serde_uses_display_form() {
        let from = parse("/page?page=1");
        let json = serde_json::to_string(&from).unwrap();
        assert_eq!(json, "\"/page?page=1\"");

        let back: FromPath = serde_json::from_str("\"page/?page=1\"").unwrap();
        assert_eq!(back, from);

        assert!(serde_json::from_str::<FromPath>("\"\"").is_err());
    }
}
