//! Whitespace-token URL extraction from raw text.
//!
//! This is a heuristic scan, not an HTML parser: a link is found only when
//! it stands as its own whitespace-delimited token.

use tracing::trace;
use url::Url;

/// Returns every whitespace-delimited token that is an absolute URL.
///
/// A token qualifies when it parses strictly and has both a non-empty
/// scheme and a non-empty host. Order is preserved and duplicates are kept.
///
/// # Examples
///
/// ```
/// use harvest_core::parser::extract_urls;
///
/// let found = extract_urls("see https://a.com/x.pdf and /y.pdf");
/// assert_eq!(found, vec!["https://a.com/x.pdf"]);
/// ```
#[tracing::instrument(level = "debug", skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| is_absolute_url(token))
        .inspect(|token| trace!(url = %token, "found absolute URL"))
        .map(str::to_string)
        .collect()
}

/// Returns every whitespace-delimited token that is a root-relative link.
///
/// A root-relative link starts with a single `/` followed by an ASCII
/// alphanumeric character (so `//host/x`, `/>` and a bare `/` are ignored)
/// and contains no control characters.
///
/// # Examples
///
/// ```
/// use harvest_core::parser::extract_relative_links;
///
/// let found = extract_relative_links("<br /> /docs/a.pdf //cdn/x.pdf");
/// assert_eq!(found, vec!["/docs/a.pdf"]);
/// ```
#[must_use]
pub fn extract_relative_links(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| is_root_relative(token))
        .inspect(|token| trace!(link = %token, "found relative link"))
        .map(str::to_string)
        .collect()
}

/// Collects absolute URLs and, when asked, root-relative links, in the
/// order they appear in `text`.
#[must_use]
pub fn collect_links(text: &str, include_relative: bool) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| is_absolute_url(token) || (include_relative && is_root_relative(token)))
        .map(str::to_string)
        .collect()
}

pub(crate) fn is_absolute_url(token: &str) -> bool {
    parse_with_authority(token).is_some_and(|parsed| {
        !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty())
    })
}

/// Parses `token` only when it is spelled `scheme://...` with no backslash.
///
/// The URL parser repairs `http:/a.com`, `https:b.com` and `https:\\c.com`
/// into URLs with a host; none of those are accepted here.
pub(crate) fn parse_with_authority(token: &str) -> Option<Url> {
    let (_, rest) = token.split_once(':')?;
    if !rest.starts_with("//") || token.contains('\\') {
        return None;
    }
    Url::parse(token).ok()
}

fn is_root_relative(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('/')
        && chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && !token.chars().any(char::is_control)
}
