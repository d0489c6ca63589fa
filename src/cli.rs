//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use harvest_core::LedgerMatch;
use harvest_core::config::MAX_TIMEOUT_SECS;

/// Harvest PDF links from a saved HTML snapshot.
///
/// Scans the input file for links, resolves relative ones against the base
/// domain, and downloads each PDF not yet recorded in the ledger.
#[derive(Parser, Debug)]
#[command(name = "pdf-harvest")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read defaults from this config file instead of the standard location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Seen-URL ledger file [default: valid_urls.txt]
    #[arg(long, value_name = "PATH", global = true)]
    pub ledger: Option<PathBuf>,

    /// Ledger membership test [default: exact]
    #[arg(long, value_enum, global = true)]
    pub ledger_match: Option<LedgerMatch>,

    /// Snapshot file to scan for links [default: test.txt]
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory downloaded PDFs are written to [default: PDFs]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Prefix for root-relative links
    #[arg(long, value_name = "URL")]
    pub base_domain: Option<String>,

    /// Per-request timeout in seconds (1-3600) [default: 180]
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub timeout: Option<u64>,

    /// Only collect absolute URLs; ignore root-relative links
    #[arg(long)]
    pub absolute_only: bool,

    /// Record new URLs in the ledger without downloading them
    #[arg(long)]
    pub record_only: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check every ledger entry is a well-formed absolute URL
    VerifyLedger,
}
