//! Error types for the download module.
//!
//! Every variant carries the URL or path it concerns so that a single log
//! line is enough to diagnose a failed download.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching and saving one PDF.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the client timeout.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Server answered with anything but `200 OK`.
    #[error("HTTP {status}{} downloading {url}", reason_suffix(.reason.as_deref()))]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase, when the code has one.
        reason: Option<String>,
    },

    /// Response `Content-Type` does not announce a PDF.
    #[error("invalid content type for {url}: {content_type} (expected application/pdf)")]
    InvalidContentType {
        /// The URL that was fetched.
        url: String,
        /// Received header value, empty when absent.
        content_type: String,
    },

    /// Server sent a PDF content type but no bytes.
    #[error("downloaded 0 bytes for {url}; not creating file")]
    EmptyBody {
        /// The URL that was fetched.
        url: String,
    },

    /// File system error while creating or writing the target file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The URL maps to a filename that cannot be used inside the output directory.
    #[error("cannot derive a filename from {url} (got '{filename}')")]
    InvalidFilename {
        /// The URL that was mapped.
        url: String,
        /// The rejected filename.
        filename: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

/// Coarse classification used for run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection, timeout, status, or body problems.
    Network,
    /// The server did not return a PDF.
    InvalidContentType,
    /// Local filesystem problems.
    Io,
    /// The URL could not be requested or named.
    InvalidUrl,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::InvalidContentType => "invalid_content_type",
            Self::Io => "io",
            Self::InvalidUrl => "invalid_url",
        };
        write!(f, "{label}")
    }
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Maps a reqwest error to [`Timeout`](Self::Timeout) or [`Network`](Self::Network).
    pub fn from_request(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16, reason: Option<&str>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            reason: reason.map(str::to_string),
        }
    }

    /// Creates an invalid content type error.
    pub fn invalid_content_type(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::InvalidContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an empty body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid filename error.
    pub fn invalid_filename(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::InvalidFilename {
            url: url.into(),
            filename: filename.into(),
        }
    }

    /// Classifies this error for statistics and per-URL outcomes.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::EmptyBody { .. }
            | Self::ClientBuild { .. } => FailureKind::Network,
            Self::InvalidContentType { .. } => FailureKind::InvalidContentType,
            Self::Io { .. } => FailureKind::Io,
            Self::InvalidUrl { .. } | Self::InvalidFilename { .. } => FailureKind::InvalidUrl,
        }
    }
}

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map(|r| format!(" {r}")).unwrap_or_default()
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path for context, which the source errors don't carry.
