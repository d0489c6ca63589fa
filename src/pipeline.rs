//! The harvest run: read, extract, dedupe, resolve, check, record, download.
//!
//! URLs are processed one at a time, top to bottom. Only the conditions in
//! [`HarvestError`] stop a run; every per-URL problem becomes a
//! [`UrlOutcome`] and the loop moves on.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, HarvestConfig};
use crate::download::constants::OUTPUT_DIR_MODE;
use crate::download::{DownloadError, DownloadOutcome, FailureKind, HttpClient};
use crate::input::read_lines;
use crate::ledger::{LedgerError, SeenLedger};
use crate::parser::{collect_links, is_url_valid, remove_duplicates, resolve_url};

/// Conditions that end a run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The ledger exists but could not be loaded.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Requested directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] DownloadError),
}

/// What happened to one resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Fetched and written.
    Downloaded {
        /// Written file.
        path: PathBuf,
        /// Body length.
        bytes: u64,
    },
    /// Target file was already present; no request made.
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },
    /// The ledger already lists this URL.
    AlreadySeen,
    /// The resolved string is not a usable request URI.
    InvalidUrl,
    /// Added to the ledger without downloading (record-only mode).
    Recorded,
    /// The download was attempted and abandoned.
    Failed {
        /// Failure class.
        kind: FailureKind,
        /// Human-readable cause.
        message: String,
    },
}

/// Per-outcome counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Unique resolved URLs found in the input.
    pub discovered: usize,
    /// Files written.
    pub downloaded: usize,
    /// Bytes written across all files.
    pub bytes: u64,
    /// Skipped because the target file existed.
    pub already_exists: usize,
    /// Skipped because the ledger listed the URL.
    pub already_seen: usize,
    /// Rejected before any request (bad URL or unusable filename).
    pub invalid: usize,
    /// Recorded without downloading.
    pub recorded: usize,
    /// Connection, timeout, status, or empty-body failures.
    pub failed_network: usize,
    /// Responses that were not PDFs.
    pub invalid_content_type: usize,
    /// Local write failures.
    pub failed_io: usize,
}

impl RunSummary {
    /// Adds one outcome to the tallies.
    pub fn record(&mut self, outcome: &UrlOutcome) {
        match outcome {
            UrlOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            UrlOutcome::AlreadyExists { .. } => self.already_exists += 1,
            UrlOutcome::AlreadySeen => self.already_seen += 1,
            UrlOutcome::InvalidUrl => self.invalid += 1,
            UrlOutcome::Recorded => self.recorded += 1,
            UrlOutcome::Failed { kind, .. } => match kind {
                FailureKind::Network => self.failed_network += 1,
                FailureKind::InvalidContentType => self.invalid_content_type += 1,
                FailureKind::Io => self.failed_io += 1,
                FailureKind::InvalidUrl => self.invalid += 1,
            },
        }
    }

    /// Downloads that were attempted and abandoned.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed_network + self.invalid_content_type + self.failed_io
    }
}

/// Finds every link in `text`, drops repeats, and resolves relative ones.
///
/// Duplicates are removed before resolution and again after it, so `/a.pdf`
/// and `<base>/a.pdf` in the same text produce one URL.
///
/// # Examples
///
/// ```
/// use harvest_core::pipeline::resolve_links;
///
/// let text = "see https://www.lincolnelectric.com/a.pdf and /b.pdf and also \
///             https://www.lincolnelectric.com/a.pdf";
/// assert_eq!(
///     resolve_links(text, "https://www.lincolnelectric.com", true),
///     vec![
///         "https://www.lincolnelectric.com/a.pdf",
///         "https://www.lincolnelectric.com/b.pdf",
///     ]
/// );
/// ```
#[must_use]
pub fn resolve_links(text: &str, base_domain: &str, include_relative: bool) -> Vec<String> {
    let links = remove_duplicates(collect_links(text, include_relative));
    let resolved = links
        .iter()
        .map(|link| resolve_url(link, base_domain))
        .collect();
    remove_duplicates(resolved)
}

/// Drives one harvest run over a fixed [`HarvestConfig`].
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    client: Option<HttpClient>,
}

impl Harvester {
    /// Validates `config` and builds the HTTP client (unless record-only).
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Config`] for invalid configuration and
    /// [`HarvestError::Client`] when the HTTP client cannot be built.
    pub fn new(config: HarvestConfig) -> Result<Self, HarvestError> {
        let config = config.validated()?;
        let client = if config.record_only {
            None
        } else {
            Some(HttpClient::new(config.timeout)?)
        };
        Ok(Self { config, client })
    }

    /// The validated configuration in use.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Runs the whole pipeline once.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::OutputDir`] when the output directory cannot
    /// be created and [`HarvestError::Ledger`] when an existing ledger
    /// cannot be read. Nothing else aborts the run.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        ensure_output_dir(&self.config.output_dir).await?;
        let mut ledger =
            SeenLedger::load(&self.config.ledger_file, self.config.ledger_match).await?;

        let lines = read_lines(&self.config.input_file).await;
        let text = lines.join("\n");
        let urls = resolve_links(
            &text,
            &self.config.base_domain,
            self.config.include_relative,
        );
        info!(
            input = %self.config.input_file.display(),
            lines = lines.len(),
            urls = urls.len(),
            "scanned input"
        );

        let mut summary = RunSummary {
            discovered: urls.len(),
            ..RunSummary::default()
        };
        for url in &urls {
            let outcome = self.process_url(url, &mut ledger).await;
            summary.record(&outcome);
        }

        info!(
            discovered = summary.discovered,
            downloaded = summary.downloaded,
            bytes = summary.bytes,
            already_exists = summary.already_exists,
            already_seen = summary.already_seen,
            recorded = summary.recorded,
            invalid = summary.invalid,
            failed = summary.failed(),
            "harvest complete"
        );
        Ok(summary)
    }

    /// Checks, records, and downloads a single resolved URL.
    pub async fn process_url(&self, url: &str, ledger: &mut SeenLedger) -> UrlOutcome {
        if !is_url_valid(url) {
            debug!(url = %url, "skipping invalid URL");
            return UrlOutcome::InvalidUrl;
        }
        if ledger.contains(url) {
            debug!(url = %url, "already in ledger");
            return UrlOutcome::AlreadySeen;
        }

        if let Err(error) = ledger.append(url).await {
            warn!(url = %url, error = %error, "failed to record URL in ledger");
        }

        let Some(client) = &self.client else {
            info!(url = %url, "recorded");
            return UrlOutcome::Recorded;
        };

        match client.download_pdf(url, &self.config.output_dir).await {
            Ok(DownloadOutcome::Downloaded { path, bytes }) => {
                UrlOutcome::Downloaded { path, bytes }
            }
            Ok(DownloadOutcome::AlreadyExists { path }) => UrlOutcome::AlreadyExists { path },
            Err(error) => {
                warn!(url = %url, kind = %error.kind(), error = %error, "download failed");
                UrlOutcome::Failed {
                    kind: error.kind(),
                    message: error.to_string(),
                }
            }
        }
    }
}

/// Creates `path` (and parents) with `rwxr-xr-x` when missing.
async fn ensure_output_dir(path: &Path) -> Result<(), HarvestError> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(OUTPUT_DIR_MODE);

    builder
        .create(path)
        .await
        .map_err(|source| HarvestError::OutputDir {
            path: path.to_path_buf(),
            source,
        })
}
