//! Seen-URL ledger: a flat, append-only text file of processed URLs.
//!
//! The file is read once when the ledger is loaded; membership checks run
//! against that in-memory snapshot, which [`SeenLedger::append`] keeps in
//! step with what it writes. One URL per line, `\n` terminated.
//!
//! # Example
//!
//! ```no_run
//! use harvest_core::{LedgerMatch, SeenLedger};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ledger = SeenLedger::load(Path::new("valid_urls.txt"), LedgerMatch::Exact).await?;
//! if !ledger.contains("https://example.com/a.pdf") {
//!     ledger.append("https://example.com/a.pdf").await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::LedgerError;

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::config::LedgerMatch;
use crate::parser::is_absolute_url;

/// In-memory view of the ledger file plus the path to extend it.
#[derive(Debug, Clone)]
pub struct SeenLedger {
    path: PathBuf,
    mode: LedgerMatch,
    content: String,
    lines: HashSet<String>,
}

/// Result of checking every ledger entry for structural validity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerAudit {
    /// Entries with a scheme and a host.
    pub valid: usize,
    /// `(line number, entry)` for every entry lacking either.
    pub invalid: Vec<(usize, String)>,
}

impl LedgerAudit {
    /// Total non-blank entries inspected.
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid + self.invalid.len()
    }
}

impl SeenLedger {
    /// Loads the ledger at `path`; a missing file is an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Read`] when the file exists but cannot be read
    /// and [`LedgerError::NotAFile`] when the path names a directory.
    pub async fn load(path: &Path, mode: LedgerMatch) -> Result<Self, LedgerError> {
        let content = read_content(path).await?.unwrap_or_default();
        Ok(Self::from_content(path, mode, content))
    }

    /// Loads the ledger at `path`, which must already exist.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), plus [`LedgerError::Missing`].
    pub async fn load_existing(path: &Path, mode: LedgerMatch) -> Result<Self, LedgerError> {
        let content = read_content(path)
            .await?
            .ok_or_else(|| LedgerError::Missing {
                path: path.to_path_buf(),
            })?;
        Ok(Self::from_content(path, mode, content))
    }

    fn from_content(path: &Path, mode: LedgerMatch, content: String) -> Self {
        let lines: HashSet<String> = entries_of(&content).map(str::to_string).collect();
        debug!(
            path = %path.display(),
            entries = lines.len(),
            mode = %mode,
            "loaded ledger"
        );
        Self {
            path: path.to_path_buf(),
            mode,
            content,
            lines,
        }
    }

    /// Reports whether `url` was already processed.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        match self.mode {
            LedgerMatch::Exact => self.lines.contains(url),
            LedgerMatch::Substring => self.content.contains(url),
        }
    }

    /// Appends `url` as a new line, creating the file when needed.
    ///
    /// A ledger whose last line lacks a newline gets one first, so the new
    /// entry never fuses with the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Append`] when the file cannot be opened or
    /// written. The in-memory snapshot is left unchanged in that case.
    pub async fn append(&mut self, url: &str) -> Result<(), LedgerError> {
        let mut record = String::with_capacity(url.len() + 2);
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            record.push('\n');
        }
        record.push_str(url);
        record.push('\n');

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o644);

        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| LedgerError::append(&self.path, e))?;
        file.write_all(record.as_bytes())
            .await
            .map_err(|e| LedgerError::append(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| LedgerError::append(&self.path, e))?;

        self.content.push_str(&record);
        self.lines.insert(url.to_string());
        trace!(url = %url, path = %self.path.display(), "recorded URL in ledger");
        Ok(())
    }

    /// Checks every non-blank entry for a scheme and a host.
    #[must_use]
    pub fn audit(&self) -> LedgerAudit {
        let mut audit = LedgerAudit::default();
        for (index, raw) in self.content.lines().enumerate() {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if is_absolute_url(entry) {
                audit.valid += 1;
            } else {
                audit.invalid.push((index + 1, entry.to_string()));
            }
        }
        audit
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the ledger holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Ledger file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active membership semantics.
    #[must_use]
    pub fn mode(&self) -> LedgerMatch {
        self.mode
    }
}

fn entries_of(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}

async fn read_content(path: &Path) -> Result<Option<String>, LedgerError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if !meta.is_file() => {
            return Err(LedgerError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(LedgerError::read(path, error)),
    }

    // Older ledgers hold raw tokens from the page, so bytes outside UTF-8
    // are replaced rather than rejected.
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| LedgerError::read(path, e))?;
    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}
