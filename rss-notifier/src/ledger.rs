use crate::types::{NotifierError, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn ledger_error(path: &Path, source: std::io::Error) -> NotifierError {
    NotifierError::Ledger {
        path: path.display().to_string(),
        source,
    }
}

/// Append-only record of identifiers that have already been delivered.
///
/// The file holds one identifier per line. It is read once when the ledger is
/// opened; after that the in-memory set is authoritative for the run and every
/// successful delivery is appended to the file straight away.
pub struct SentLedger {
    path: PathBuf,
    sent: HashSet<String>,
    persist: bool,
}

impl SentLedger {
    /// Creates an empty ledger file at `path` if none exists.
    pub fn ensure_exists(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => {
                info!("Created sent news file: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(ledger_error(path, e)),
        }
    }

    /// Reads every identifier in the file. Blank lines, including the one left
    /// by the final newline, are not identifiers and are dropped.
    pub fn load_all(path: impl AsRef<Path>) -> Result<HashSet<String>> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| ledger_error(path, e))?;

        Ok(data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Appends `identifier` followed by a newline using a single write.
    pub fn append(path: impl AsRef<Path>, identifier: &str) -> Result<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| ledger_error(path, e))?;

        let line = format!("{}\n", identifier);
        file.write_all(line.as_bytes())
            .map_err(|e| ledger_error(path, e))?;
        file.flush().map_err(|e| ledger_error(path, e))?;
        Ok(())
    }

    /// Initializes the file if needed and loads it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Self::ensure_exists(&path)?;
        let sent = Self::load_all(&path)?;
        info!("Loaded {} sent identifiers from {}", sent.len(), path.display());

        Ok(Self {
            path,
            sent,
            persist: true,
        })
    }

    /// Loads the ledger without ever touching the file again. A missing file
    /// counts as an empty ledger. Used for dry runs.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sent = if path.exists() {
            Self::load_all(&path)?
        } else {
            HashSet::new()
        };
        info!(
            "Loaded {} sent identifiers from {} (read-only)",
            sent.len(),
            path.display()
        );

        Ok(Self {
            path,
            sent,
            persist: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.sent.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// Marks `identifier` as delivered. The in-memory set is updated first; a
    /// failed append still counts the identifier as sent for this run.
    pub fn record(&mut self, identifier: &str) -> Result<()> {
        if !self.sent.insert(identifier.to_string()) {
            debug!("Identifier already recorded: {}", identifier);
            return Ok(());
        }

        if self.persist {
            Self::append(&self.path, identifier)?;
        }
        Ok(())
    }
}
