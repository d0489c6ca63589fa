//! PDF download: filename derivation, one bounded GET, write-once storage.
//!
//! # Features
//!
//! - Deterministic filenames derived from the URL ([`url_to_filename`])
//! - Existing files are never overwritten and never re-requested
//! - Whole-request timeout (3 minutes by default)
//! - Status, `Content-Type`, and empty-body validation before anything is written
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use harvest_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::with_default_timeout()?;
//! let outcome = client
//!     .download_pdf("https://example.com/paper.pdf", Path::new("./PDFs"))
//!     .await?;
//! println!("Saved: {}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod filename;

pub use client::{DownloadOutcome, HttpClient};
pub use error::{DownloadError, FailureKind};
pub use filename::url_to_filename;
