//! Rule store holding the latest endpoint per rule.
//!
//! The store owns both the in-memory table and the lock guarding it.
//! Persistence only happens while that lock is held, so mutations and
//! the file writes that follow them are totally ordered.

use super::error::StoreError;
use super::persistence::{read_table, write_table};
use super::types::{EndpointRecord, RuleTable};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The rule table together with the file it is persisted to.
///
/// Share it between handlers as `Arc<RuleStore>`.
#[derive(Debug)]
pub struct RuleStore {
    /// Data file the table is persisted to.
    path: PathBuf,

    /// The table itself. Every read and write goes through this lock.
    table: Mutex<RuleTable>,
}

impl RuleStore {
    /// Creates an empty store persisting to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: Mutex::new(RuleTable::new()),
        }
    }

    /// Loads the store from `path`.
    ///
    /// Never fails: a missing file yields an empty table, and an unreadable
    /// or corrupt file is logged and also yields an empty table.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let table = match read_table(&path) {
            Ok(Some(table)) => {
                tracing::info!(path = %path.display(), rules = table.len(), "Loaded existing rule data");
                table
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "Rule data file not found, starting with empty data");
                RuleTable::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load rule data, starting with empty data");
                RuleTable::new()
            }
        };

        Self {
            path,
            table: Mutex::new(table),
        }
    }

    /// Returns the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets `rule_name` to `record`, persists the table, and returns the
    /// resulting snapshot.
    pub fn upsert(&self, rule_name: &str, record: EndpointRecord) -> Result<RuleTable, StoreError> {
        let mut snapshot = RuleTable::new();
        self.upsert_with(rule_name, record, |table| snapshot = table.clone())?;
        Ok(snapshot)
    }

    /// Sets `rule_name` to `record`, persists the table, then calls
    /// `on_commit` with the committed table while the lock is still held.
    ///
    /// Commits and their `on_commit` calls happen in the same total order,
    /// so anything published from `on_commit` never goes backwards.
    /// If persisting fails the previous record is restored, so the
    /// in-memory table always matches what is on disk, and `on_commit`
    /// is not called.
    pub fn upsert_with<F>(
        &self,
        rule_name: &str,
        record: EndpointRecord,
        on_commit: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&RuleTable),
    {
        let mut table = self.table.lock().map_err(|_| StoreError::Poisoned)?;

        let previous = table.insert(rule_name.to_string(), record);

        if let Err(e) = write_table(&self.path, &table) {
            match previous {
                Some(old) => {
                    table.insert(rule_name.to_string(), old);
                }
                None => {
                    table.remove(rule_name);
                }
            }
            return Err(e);
        }

        tracing::debug!(path = %self.path.display(), rules = table.len(), "Rule data saved");
        on_commit(&table);
        Ok(())
    }

    /// Returns a consistent copy of the full table.
    pub fn snapshot(&self) -> Result<RuleTable, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.clone())
    }

    /// Returns the number of rules currently stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.len())
    }

    /// Returns true if no rule has been stored yet.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    #[cfg(test)]
    fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.table.lock().unwrap();
            panic!("poisoning rule table lock");
        }));
    }
}
