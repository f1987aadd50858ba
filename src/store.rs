// Account store: an ordered name -> record mapping persisted as a single
// JSON document. Every mutation is written to disk before it becomes
// visible in memory, so a restart never observes a change that was not
// saved.

use crate::error::{StoreError, StoreResult};
use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rule printed between exported accounts.
const EXPORT_RULE_WIDTH: usize = 40;

/// One saved account. Field names follow the on-disk format; the names
/// used by older files (`cookie`, `added_date`, `last_used`) are still
/// accepted when reading.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(alias = "cookie")]
    pub credential: String,
    /// Set when the account is added. Only hand-edited files lack it.
    #[serde(default, alias = "added_date")]
    pub added_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "last_used")]
    pub last_used_at: Option<NaiveDateTime>,
}

impl AccountRecord {
    fn new(credential: String, notes: String) -> Self {
        AccountRecord {
            credential,
            added_at: Some(now()),
            notes,
            last_used_at: None,
        }
    }
}

/// A row produced by [`AccountStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountEntry<'a> {
    /// 1-based position, for display.
    pub index: usize,
    pub name: &'a str,
    pub record: &'a AccountRecord,
    pub is_selected: bool,
}

type Records = IndexMap<String, AccountRecord>;

/// Saved accounts plus the account currently switched to.
///
/// The selection is process-local: it is not written to the backend file
/// and starts out empty after every load.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
    records: Records,
    selected: Option<String>,
}

impl AccountStore {
    /// Empty store that will persist to `path`. Nothing is written until
    /// the first mutation.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        AccountStore {
            path: path.into(),
            records: Records::new(),
            selected: None,
        }
    }

    /// Load the store, treating a missing or unreadable/corrupt file as an
    /// empty store. Availability wins over strict validation here; use
    /// [`AccountStore::try_load`] to see why a store came back empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "starting with an empty account list");
                Self::empty(path)
            }
        }
    }

    /// Load the store. A missing file is an empty store; a file that cannot
    /// be read or parsed is an error.
    pub fn try_load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        let records: Records = match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(source) => return Err(StoreError::Corrupt { path, source }),
        };
        Ok(AccountStore {
            path,
            records,
            selected: None,
        })
    }

    /// Backend file this store reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AccountRecord> {
        self.records.get(name)
    }

    /// Name of the account currently switched to.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Add a new account. Existing accounts are never overwritten.
    pub fn add(&mut self, name: &str, credential: &str, notes: &str) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if credential.trim().is_empty() {
            return Err(StoreError::EmptyCredential);
        }
        if self.records.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        let mut next = self.records.clone();
        next.insert(
            name.to_string(),
            AccountRecord::new(credential.to_string(), notes.to_string()),
        );
        self.commit(next)?;
        info!(account = name, "account added");
        Ok(())
    }

    /// Remove an account and return its record. Clears the selection if it
    /// pointed at the removed account.
    pub fn remove(&mut self, name: &str) -> StoreResult<AccountRecord> {
        let mut next = self.records.clone();
        let record = next
            .shift_remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        self.commit(next)?;
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        info!(account = name, "account removed");
        Ok(record)
    }

    /// Switch to an account and stamp its last-used time.
    pub fn select(&mut self, name: &str) -> StoreResult<&AccountRecord> {
        let mut next = self.records.clone();
        let record = next
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        record.last_used_at = Some(now());
        self.commit(next)?;
        self.selected = Some(name.to_string());
        info!(account = name, "switched account");
        self.records
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Cookie of the selected account, if there is one.
    pub fn current_credential(&self) -> Option<&str> {
        self.selected
            .as_deref()
            .and_then(|name| self.records.get(name))
            .map(|record| record.credential.as_str())
    }

    /// Accounts in the order they were added. Call again to start over.
    pub fn list(&self) -> impl Iterator<Item = AccountEntry<'_>> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(i, (name, record))| AccountEntry {
                index: i + 1,
                name,
                record,
                is_selected: self.selected.as_deref() == Some(name.as_str()),
            })
    }

    /// Write every account's name, cookie and added date to `path` in a
    /// plain text format, replacing whatever the file held. Returns the
    /// number of accounts written.
    pub fn export_all(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        let mut out = String::new();
        for (name, record) in &self.records {
            let added = record
                .added_at
                .as_ref()
                .map_or_else(|| "N/A".to_string(), format_timestamp);
            // Writing into a String cannot fail.
            let _ = writeln!(out, "Username: {name}");
            let _ = writeln!(out, "Cookie: {}", record.credential);
            let _ = writeln!(out, "Added: {added}");
            let _ = writeln!(out, "{}", "-".repeat(EXPORT_RULE_WIDTH));
        }
        ensure_parent(path)?;
        fs::write(path, out).map_err(|e| StoreError::io(path, e))?;
        info!(path = %path.display(), count = self.records.len(), "exported cookies");
        Ok(self.records.len())
    }

    /// Write the whole mapping to the backend file.
    pub fn save(&self) -> StoreResult<()> {
        write_records(&self.path, &self.records)
    }

    fn commit(&mut self, next: Records) -> StoreResult<()> {
        write_records(&self.path, &next)?;
        self.records = next;
        Ok(())
    }
}

/// Timestamp in the same `YYYY-MM-DDTHH:MM:SS[.f]` shape as the JSON file.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn ensure_parent(path: &Path) -> StoreResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
        }
        _ => Ok(()),
    }
}

// Serialize next to the target and rename over it, so an interrupted write
// leaves the previous file intact.
fn write_records(path: &Path, records: &Records) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}
