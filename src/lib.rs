//! PDF Harvest Core Library
//!
//! This library scans a saved HTML snapshot for links to PDF documents,
//! deduplicates and resolves them, and downloads each new one exactly once,
//! keeping a plain-text ledger of every URL it has processed.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`input`] - Best-effort line reading of the snapshot
//! - [`parser`] - Link extraction, deduplication, and resolution
//! - [`ledger`] - Seen-URL ledger file
//! - [`download`] - Filename derivation and the PDF download client
//! - [`pipeline`] - The sequential run tying everything together
//! - [`config`] - Run configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod input;
pub mod ledger;
pub mod parser;
pub mod pipeline;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, HarvestConfig, LedgerMatch};
pub use download::{DownloadError, DownloadOutcome, FailureKind, HttpClient, url_to_filename};
pub use ledger::{LedgerAudit, LedgerError, SeenLedger};
pub use parser::{
    collect_links, domain_from_url, extract_relative_links, extract_urls, is_url_valid,
    remove_duplicates, resolve_url,
};
pub use pipeline::{Harvester, HarvestError, RunSummary, UrlOutcome, resolve_links};
