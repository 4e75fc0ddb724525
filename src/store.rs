//! The record store: the ordered list of expenses and its persistence.
//!
//! The list lives in memory and is mirrored, as a JSON array, to a key-value [`BlobStore`] after
//! every mutation that changes it. Reading the blob never fails: an absent, unreadable or malformed
//! blob yields an empty list, and stored records with a non-positive amount or a repeated id are
//! skipped.

use crate::model::Expense;
use crate::{fs, Result};
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

/// The key under which the record list is persisted.
pub const STORAGE_KEY: &str = "expenses";

/// A string blob store addressed by key.
pub trait BlobStore {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// A [`BlobStore`] that keeps each key in a `<key>.json` file inside a directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        fs::read_optional(self.path(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write_all(self.path(key), value)
    }
}

/// An in-memory [`BlobStore`].
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.into(), value.into());
        Self { blobs }
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owns the record list, most recent first, and persists it on every change.
///
/// Mutations return `Ok(true)` when the list changed and was written, `Ok(false)` when the call was
/// a no-op, and `Err` only when writing to the blob store failed. The in-memory list only changes
/// once the write has succeeded, so after an `Err` it still matches the blob.
#[derive(Debug, Clone)]
pub struct Store<B> {
    blob: B,
    key: String,
    records: Vec<Expense>,
}

impl<B> Store<B>
where
    B: BlobStore,
{
    /// Initializes the store from the blob under [`STORAGE_KEY`].
    pub fn load(blob: B) -> Self {
        Self::load_with_key(blob, STORAGE_KEY)
    }

    /// Initializes the store from the blob under `key`.
    pub fn load_with_key(blob: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = read_records(&blob, &key);
        debug!("Loaded {} expense(s) from '{key}'", records.len());
        Self { blob, key, records }
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn blob(&self) -> &B {
        &self.blob
    }

    /// Inserts `record` at the head of the list.
    ///
    /// No-op if the amount is not positive or the id is already taken.
    pub fn add(&mut self, record: Expense) -> Result<bool> {
        if !record.amount.is_positive() {
            debug!("Ignoring expense with non-positive amount {}", record.amount);
            return Ok(false);
        }
        if self.get(&record.id).is_some() {
            warn!("Ignoring expense with duplicate id '{}'", record.id);
            return Ok(false);
        }
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record);
        records.extend(self.records.iter().cloned());
        self.commit(records)?;
        Ok(true)
    }

    /// Replaces the record whose id is `id` with `record`, keeping its position and its id.
    ///
    /// No-op if no record has that id or the new amount is not positive.
    pub fn update(&mut self, id: &str, mut record: Expense) -> Result<bool> {
        if !record.amount.is_positive() {
            debug!("Ignoring update of '{id}' with non-positive amount {}", record.amount);
            return Ok(false);
        }
        let Some(ix) = self.records.iter().position(|r| r.id == id) else {
            debug!("No expense with id '{id}' to update");
            return Ok(false);
        };
        record.id = id.to_string();
        let mut records = self.records.clone();
        records[ix] = record;
        self.commit(records)?;
        Ok(true)
    }

    /// Removes the record whose id is `id`. No-op if it is absent.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let records: Vec<Expense> = self
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        if records.len() == self.records.len() {
            debug!("No expense with id '{id}' to delete");
            return Ok(false);
        }
        self.commit(records)?;
        Ok(true)
    }

    /// Discards the current contents and stores `records` in their given order.
    pub fn replace_all(&mut self, records: Vec<Expense>) -> Result<()> {
        self.commit(records)
    }

    /// Writes `records` to the blob and, only if that succeeds, makes them the current list.
    fn commit(&mut self, records: Vec<Expense>) -> Result<()> {
        let json =
            serde_json::to_string(&records).context("Unable to serialize the expense list")?;
        self.blob
            .set(&self.key, &json)
            .with_context(|| format!("Unable to persist expenses under '{}'", self.key))?;
        debug!("Persisted {} expense(s)", records.len());
        self.records = records;
        Ok(())
    }
}

fn read_records<B: BlobStore>(blob: &B, key: &str) -> Vec<Expense> {
    let raw = match blob.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Unable to read stored expenses, starting empty: {e:#}");
            return Vec::new();
        }
    };
    let records: Vec<Expense> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("Stored expenses are malformed, starting empty: {e}");
            return Vec::new();
        }
    };

    let total = records.len();
    let mut seen = HashSet::new();
    let records: Vec<Expense> = records
        .into_iter()
        .filter(|r| r.amount.is_positive() && seen.insert(r.id.clone()))
        .collect();
    if records.len() < total {
        warn!(
            "Skipped {} stored expense(s) with a non-positive amount or a repeated id",
            total - records.len()
        );
    }
    records
}
