//! Run configuration shared by every pipeline component.
//!
//! A [`HarvestConfig`] is built once (defaults, then config file, then CLI)
//! and handed to the components that need it. Nothing here is global.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::download::constants::DEFAULT_TIMEOUT_SECS;

/// Default file scanned for links.
pub const DEFAULT_INPUT_FILE: &str = "test.txt";

/// Default seen-URL ledger.
pub const DEFAULT_LEDGER_FILE: &str = "valid_urls.txt";

/// Default download destination.
pub const DEFAULT_OUTPUT_DIR: &str = "PDFs";

/// Default prefix for relative links.
pub const DEFAULT_BASE_DOMAIN: &str = "https://www.lincolnelectric.com";

/// Upper bound accepted for the request timeout (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// How the ledger decides whether a URL was already processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LedgerMatch {
    /// A URL is seen when it equals one ledger line exactly.
    #[default]
    Exact,
    /// A URL is seen when it occurs anywhere in the ledger content.
    ///
    /// Matches legacy ledgers byte-for-byte, including the false positive
    /// where `.../a.pdf` counts as seen because `.../a.pdf.bak` was recorded.
    Substring,
}

impl LedgerMatch {
    /// Returns the stable label used in config files and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
        }
    }
}

impl fmt::Display for LedgerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerMatch {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "substring" => Ok(Self::Substring),
            other => Err(ConfigError::invalid(
                "ledger_match",
                format!("'{other}' (expected \"exact\" or \"substring\")"),
            )),
        }
    }
}

/// Errors raised while assembling a [`HarvestConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its accepted domain.
    #[error("invalid value for `{field}`: {detail}")]
    Invalid {
        /// Field name as it appears in config files.
        field: &'static str,
        /// What was wrong with the value.
        detail: String,
    },
}

impl ConfigError {
    /// Creates an invalid-value error.
    pub fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            detail: detail.into(),
        }
    }
}

/// Everything a harvest run needs to know, fixed for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Text/HTML file scanned for links.
    pub input_file: PathBuf,
    /// Newline-delimited ledger of processed URLs.
    pub ledger_file: PathBuf,
    /// Directory receiving downloaded PDFs.
    pub output_dir: PathBuf,
    /// Prefix for links without a host, e.g. `https://example.com`.
    pub base_domain: String,
    /// Whole-request deadline for each GET.
    pub timeout: Duration,
    /// Ledger membership semantics.
    pub ledger_match: LedgerMatch,
    /// Also collect root-relative links such as `/docs/a.pdf`.
    pub include_relative: bool,
    /// Record URLs in the ledger without downloading them.
    pub record_only: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            ledger_file: PathBuf::from(DEFAULT_LEDGER_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ledger_match: LedgerMatch::default(),
            include_relative: true,
            record_only: false,
        }
    }
}

impl HarvestConfig {
    /// Checks cross-field constraints and normalizes the base domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the base domain is not an
    /// absolute http(s) URL or the timeout is outside `1..=3600` seconds.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.base_domain = normalize_base_domain(&self.base_domain)?;

        let secs = self.timeout.as_secs();
        if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(ConfigError::invalid(
                "timeout_secs",
                format!("{secs} (expected 1..={MAX_TIMEOUT_SECS})"),
            ));
        }

        Ok(self)
    }
}

/// Trims a trailing `/` so that `base + "/path"` never doubles the slash.
fn normalize_base_domain(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ConfigError::invalid("base_domain", format!("'{trimmed}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "base_domain",
            format!("'{trimmed}' must use http or https"),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::invalid(
            "base_domain",
            format!("'{trimmed}' has no host"),
        ));
    }

    Ok(trimmed.to_string())
}
