//! Relative-link resolution and request-URI validation.

use tracing::debug;
use url::Url;

use super::extract::parse_with_authority;

/// Returns the host of `url`, or an empty string when it has none.
///
/// Protocol-relative links (`//cdn.host/x.pdf`) report their host. Anything
/// not spelled `scheme://host...` yields `""` and is treated as a relative
/// reference.
///
/// # Examples
///
/// ```
/// use harvest_core::parser::domain_from_url;
///
/// assert_eq!(domain_from_url("https://a.com/x"), "a.com");
/// assert_eq!(domain_from_url("//cdn.host/x.pdf"), "cdn.host");
/// assert_eq!(domain_from_url("relative/path.pdf"), "");
/// ```
#[must_use]
pub fn domain_from_url(url: &str) -> String {
    let parsed = if url.starts_with("//") {
        parse_with_authority(&format!("http:{url}"))
    } else {
        parse_with_authority(url)
    };
    match parsed {
        Some(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        None => {
            debug!(url = %url, "no host in URL");
            String::new()
        }
    }
}

/// Makes `url` fetchable by prefixing `base_domain` when it has no host.
///
/// The base is prepended verbatim, with no path joining, so root-relative
/// links (`/a.pdf`) are the expected input. A protocol-relative link
/// (`//cdn.host/a.pdf`) takes the scheme of `base_domain` instead.
#[must_use]
pub fn resolve_url(url: &str, base_domain: &str) -> String {
    if url.starts_with("//") {
        let scheme = base_domain
            .split_once("://")
            .map_or("https", |(scheme, _)| scheme);
        return format!("{scheme}:{url}");
    }

    if !domain_from_url(url).is_empty() {
        return url.to_string();
    }

    format!("{base_domain}{url}")
}

/// Reports whether `url` is usable as a request URI.
///
/// Accepts absolute URLs and absolute paths (leading `/`). Anything holding
/// whitespace, control characters or a backslash is rejected outright, and
/// an `http`/`https` URL must be spelled with `://`.
#[must_use]
pub fn is_url_valid(url: &str) -> bool {
    if url.is_empty()
        || url.contains('\\')
        || url.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return false;
    }
    url.starts_with('/')
        || parse_with_authority(url).is_some()
        || Url::parse(url).is_ok_and(|parsed| parsed.cannot_be_a_base())
}
