//! Deterministic URL-to-filename mapping for downloaded PDFs.
//!
//! The same URL must always map to the same name: the downloader relies on
//! the name alone to detect files it already saved on an earlier run.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::error::DownloadError;

/// Any run of characters outside `[a-z0-9]`.
#[allow(clippy::expect_used)]
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("non-alphanumeric regex is valid"));

#[allow(clippy::expect_used)]
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("_+").expect("underscore regex is valid"));

/// Fragments left behind by the extension once dots became underscores.
const REDUNDANT_FRAGMENTS: [&str; 2] = ["_pdf", "_zip"];

/// Converts a URL into a filesystem-safe filename.
///
/// The base name of the last path element is lowercased, every run of
/// non-alphanumeric characters becomes one `_`, a single leading `_` is
/// dropped, every `_pdf`/`_zip` fragment is removed, and the original
/// extension is appended again.
///
/// # Examples
///
/// ```
/// use harvest_core::download::url_to_filename;
///
/// assert_eq!(
///     url_to_filename("https://www.lincolnelectric.com/Downloads/Spec_Sheet.PDF"),
///     "spec_sheet.pdf"
/// );
/// assert_eq!(
///     url_to_filename("https://example.com/files/file-name_v2.ZIP"),
///     "file_name_v2.zip"
/// );
/// ```
#[must_use]
pub fn url_to_filename(url: &str) -> String {
    let lowercase = url.to_lowercase();
    let extension = extension_of(&lowercase);
    let base = base_name(&lowercase);

    let replaced = NON_ALPHANUMERIC.replace_all(base, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    let mut name = collapsed
        .strip_prefix('_')
        .unwrap_or(collapsed.as_ref())
        .to_string();

    for fragment in REDUNDANT_FRAGMENTS {
        name = name.replace(fragment, "");
    }

    name.push_str(extension);
    name
}

/// Joins the sanitized filename for `url` onto `output_dir`.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidFilename`] when the URL yields an empty
/// name or one that would escape `output_dir` (`.`/`..`).
pub(crate) fn target_path(url: &str, output_dir: &Path) -> Result<PathBuf, DownloadError> {
    let filename = url_to_filename(url).to_lowercase();
    if filename.is_empty() || !is_safe_filename_segment(&filename) {
        return Err(DownloadError::invalid_filename(url, filename));
    }
    Ok(output_dir.join(filename))
}

/// Suffix starting at the last `.` of the final path element, or `""`.
fn extension_of(path: &str) -> &str {
    let last_element_start = path.rfind('/').map_or(0, |pos| pos + 1);
    let last_element = &path[last_element_start..];
    last_element
        .rfind('.')
        .map_or("", |pos| &last_element[pos..])
}

/// Final path element, ignoring trailing slashes.
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    trimmed
        .rfind('/')
        .map_or(trimmed, |pos| &trimmed[pos + 1..])
}

fn is_safe_filename_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
