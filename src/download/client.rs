//! HTTP client wrapper for fetching PDFs.
//!
//! This module provides the `HttpClient` struct which performs one bounded
//! GET per URL, validates the response, and writes the body to disk only
//! when it is a non-empty PDF.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{DEFAULT_TIMEOUT_SECS, PDF_CONTENT_TYPE};
use super::error::DownloadError;
use super::filename::target_path;
use crate::user_agent;

/// HTTP client for downloading PDFs.
///
/// Create it once per run and reuse it for every URL, taking advantage of
/// connection pooling.
///
/// # Example
///
/// ```no_run
/// use harvest_core::download::{DownloadOutcome, HttpClient};
/// use std::path::Path;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(Duration::from_secs(180))?;
/// match client.download_pdf("https://example.com/a.pdf", Path::new("PDFs")).await? {
///     DownloadOutcome::Downloaded { path, bytes } => println!("{bytes} bytes -> {}", path.display()),
///     DownloadOutcome::AlreadyExists { path } => println!("have {}", path.display()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

/// What a successful call to [`HttpClient::download_pdf`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The PDF was fetched and written.
    Downloaded {
        /// Where the file was written.
        path: PathBuf,
        /// Body length in bytes, always non-zero.
        bytes: u64,
    },
    /// A file already sat at the target path; nothing was requested.
    AlreadyExists {
        /// The existing file.
        path: PathBuf,
    },
}

impl DownloadOutcome {
    /// Path of the file this outcome refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::AlreadyExists { path } => path,
        }
    }
}

impl HttpClient {
    /// Creates a client whose requests must finish within `timeout`.
    ///
    /// The timeout covers the whole request: connecting, headers, and body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] when the TLS backend or system
    /// configuration prevents building the client.
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        Ok(Self { client, timeout })
    }

    /// Creates a client with the default 3 minute timeout.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_default_timeout() -> Result<Self, DownloadError> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Downloads the PDF at `url` into `output_dir`.
    ///
    /// The file name comes from [`url_to_filename`](super::url_to_filename).
    /// An existing file at that path short-circuits the call before any
    /// network traffic; files are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid or maps to an unusable filename
    /// - The request fails or times out
    /// - The status is anything other than 200
    /// - `Content-Type` does not contain `application/pdf`
    /// - The body is empty
    /// - Creating or writing the file fails
    #[instrument(skip(self, output_dir), fields(url = %url))]
    pub async fn download_pdf(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        let file_path = target_path(url, output_dir)?;

        if is_regular_file(&file_path).await {
            info!(path = %file_path.display(), "file already exists, skipping");
            return Ok(DownloadOutcome::AlreadyExists { path: file_path });
        }

        debug!(timeout_secs = self.timeout.as_secs(), "starting download");
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_request(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(
                url,
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_pdf_content_type(&content_type) {
            return Err(DownloadError::invalid_content_type(url, content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_request(url, e))?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        write_file(&file_path, &body).await?;

        let bytes = body.len() as u64;
        info!(path = %file_path.display(), bytes, "download complete");
        Ok(DownloadOutcome::Downloaded {
            path: file_path,
            bytes,
        })
    }

    /// Configured whole-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Substring match, so `application/pdf; charset=binary` is accepted.
fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(PDF_CONTENT_TYPE)
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Writes `body` to a freshly created `path`, removing the file if the
/// write does not complete.
async fn write_file(path: &Path, body: &[u8]) -> Result<(), DownloadError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let written = async {
        file.write_all(body).await?;
        file.flush().await
    }
    .await;

    if let Err(error) = written {
        drop(file);
        debug!(path = %path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
        return Err(DownloadError::io(path, error));
    }

    Ok(())
}
