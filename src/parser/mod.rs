//! Link discovery and normalization for scanned snapshots.
//!
//! This module turns raw snapshot text into fetchable URLs:
//!
//! - [`extract_urls`] / [`extract_relative_links`] find candidate tokens
//! - [`remove_duplicates`] drops repeats while keeping first-seen order
//! - [`resolve_url`] prefixes the base domain onto host-less links
//! - [`is_url_valid`] rejects strings that cannot be requested
//!
//! # Example
//!
//! ```
//! use harvest_core::parser::{collect_links, remove_duplicates, resolve_url};
//!
//! let text = "https://a.com/x.pdf /y.pdf https://a.com/x.pdf";
//! let links = remove_duplicates(collect_links(text, true));
//! let resolved: Vec<String> = links
//!     .iter()
//!     .map(|link| resolve_url(link, "https://a.com"))
//!     .collect();
//! assert_eq!(resolved, vec!["https://a.com/x.pdf", "https://a.com/y.pdf"]);
//! ```

mod extract;
mod resolve;

pub use extract::{collect_links, extract_relative_links, extract_urls};
pub use resolve::{domain_from_url, is_url_valid, resolve_url};

pub(crate) use extract::is_absolute_url;

use std::collections::HashSet;

/// Removes repeated entries, keeping the first occurrence of each.
///
/// Equality is exact string equality. Applying it twice gives the same
/// result as applying it once.
#[must_use]
pub fn remove_duplicates(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
