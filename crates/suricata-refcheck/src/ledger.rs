//! Dedup ledger, an append-only record of URLs already verified.
//!
//! Features:
//! - One URL per line, appended as soon as the URL is done (no buffering)
//! - Missing ledger file loads as empty
//! - `claim` reserves a URL so concurrent workers never verify it twice
//! - `archive` moves the file to `<stem>_<YYYYMMDD>.<ext>` and starts fresh

use crate::error::{RefcheckError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct LedgerState {
    /// URLs finished in this or an earlier run.
    done: HashSet<String>,
    /// URLs claimed by a worker but not yet recorded.
    in_flight: HashSet<String>,
}

/// Persisted set of processed URLs.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let done = read_entries(&path)?;
        tracing::debug!(
            "loaded {} processed URL(s) from {}",
            done.len(),
            path.display()
        );
        Ok(Self {
            path,
            state: Mutex::new(LedgerState {
                done,
                in_flight: HashSet::new(),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and merge anything another writer appended.
    pub fn refresh(&self) -> Result<()> {
        let entries = read_entries(&self.path)?;
        self.lock().done.extend(entries);
        Ok(())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().done.contains(url)
    }

    /// Reserve `url` for verification.
    ///
    /// Returns `false` if the URL is already recorded or claimed by another
    /// worker. Check and reservation happen under one lock.
    pub fn claim(&self, url: &str) -> bool {
        let mut state = self.lock();
        if state.done.contains(url) || state.in_flight.contains(url) {
            return false;
        }
        state.in_flight.insert(url.to_string());
        true
    }

    /// Drop a claim without recording the URL.
    pub fn release(&self, url: &str) {
        self.lock().in_flight.remove(url);
    }

    /// Mark `url` as processed, in memory and on disk.
    pub fn record(&self, url: &str) -> Result<()> {
        let mut state = self.lock();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RefcheckError::io(&self.path, e))?;
        writeln!(file, "{url}").map_err(|e| RefcheckError::io(&self.path, e))?;

        state.in_flight.remove(url);
        state.done.insert(url.to_string());
        Ok(())
    }

    /// Number of recorded URLs.
    pub fn len(&self) -> usize {
        self.lock().done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the ledger file to its date-stamped name and start an empty one.
    ///
    /// An archive from an earlier run on the same date is replaced.
    pub fn archive(&self, date: NaiveDate) -> Result<PathBuf> {
        let mut state = self.lock();
        let dated = archive_path(&self.path, date);

        if self.path.exists() {
            std::fs::rename(&self.path, &dated).map_err(|e| RefcheckError::io(&dated, e))?;
        } else {
            std::fs::File::create(&dated).map_err(|e| RefcheckError::io(&dated, e))?;
        }
        std::fs::File::create(&self.path).map_err(|e| RefcheckError::io(&self.path, e))?;

        state.done.clear();
        state.in_flight.clear();
        tracing::info!("processed URLs archived as {}", dated.display());
        Ok(dated)
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // A panicked writer leaves the sets consistent: every mutation is a
        // single insert or remove.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Date-stamped archive name: `processed_urls.txt` → `processed_urls_20261019.txt`.
pub fn archive_path(base: &Path, date: NaiveDate) -> PathBuf {
    let stamp = date.format("%Y%m%d");
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("processed_urls");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{stamp}.{ext}"),
        None => format!("{stem}_{stamp}"),
    };
    base.with_file_name(name)
}

fn read_entries(path: &Path) -> Result<HashSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashSet::new()),
        Err(e) => Err(RefcheckError::io(path, e)),
    }
}
