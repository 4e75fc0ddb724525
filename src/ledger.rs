//! The top-level state object that ties the store, the form and the filter together.

use crate::codec::{self, Decoded};
use crate::form::{Form, Submission};
use crate::ids::{IdGenerator, UuidIds};
use crate::store::{BlobStore, Store};
use crate::view::{view, Criteria, View};
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Summary of a completed import.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct ImportReport {
    /// Records now in the store.
    pub kept: usize,
    /// Entries of the document that were dropped.
    pub dropped: usize,
    /// Records that were in the store before and have been discarded.
    pub replaced: usize,
}

/// Owns everything the application mutates: the record store, the form, and the filter criteria.
#[derive(Debug, Clone)]
pub struct Ledger<B, I = UuidIds> {
    store: Store<B>,
    form: Form,
    criteria: Criteria,
    ids: I,
}

impl<B> Ledger<B, UuidIds>
where
    B: BlobStore,
{
    /// Loads the store from `blob`, with a blank form and this month's criteria.
    pub fn load(blob: B, today: NaiveDate) -> Self {
        Self::load_with_ids(Store::load(blob), UuidIds, today)
    }
}

impl<B, I> Ledger<B, I>
where
    B: BlobStore,
    I: IdGenerator,
{
    pub fn load_with_ids(store: Store<B>, ids: I, today: NaiveDate) -> Self {
        Self {
            store,
            form: Form::new(today),
            criteria: Criteria::this_month(today),
            ids,
        }
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
    }

    /// The current view under the current criteria.
    pub fn view(&self) -> View<'_> {
        view(self.store.records(), &self.criteria)
    }

    pub fn start_edit(&mut self, id: &str) -> bool {
        self.form.start_edit(&self.store, id)
    }

    pub fn cancel(&mut self, today: NaiveDate) {
        self.form.cancel(today)
    }

    pub fn submit(&mut self, today: NaiveDate) -> Result<Submission> {
        self.form.submit(&mut self.store, &mut self.ids, today)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.store.delete(id)
    }

    /// The whole store as an export document.
    pub fn export(&self) -> Result<String> {
        codec::export(self.store.records())
    }

    /// Replaces the entire store with the records decoded from `raw`.
    ///
    /// If `raw` is not a JSON array the store is left unchanged and the error is returned.
    pub fn import(&mut self, raw: &str) -> Result<ImportReport> {
        let decoded = self.decode_import(raw)?;
        self.apply_import(decoded)
    }

    /// Decodes an import document without touching the store.
    pub fn decode_import(&mut self, raw: &str) -> Result<Decoded> {
        codec::import(raw, &mut self.ids).inspect_err(|e| {
            warn!("Import aborted, expenses left unchanged: {e:#}");
        })
    }

    /// Replaces the entire store with already decoded records.
    pub fn apply_import(&mut self, decoded: Decoded) -> Result<ImportReport> {
        let Decoded { records, dropped } = decoded;
        let replaced = self.store.len();
        let kept = records.len();
        self.store.replace_all(records)?;
        info!("Imported {kept} expense(s), dropped {dropped}, replaced {replaced}");
        Ok(ImportReport {
            kept,
            dropped,
            replaced,
        })
    }
}

/// Reads an import file. This is the only operation that suspends; the ledger stays usable while
/// it is pending.
pub async fn read_import(path: &Path) -> Result<String> {
    utils::read(path)
        .await
        .context("Unable to read the import file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::Amount;
    use crate::store::{MemoryStore, STORAGE_KEY};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    fn ledger() -> Ledger<MemoryStore, SequentialIds> {
        Ledger::load_with_ids(
            Store::load(MemoryStore::new()),
            SequentialIds::new("id"),
            today(),
        )
    }

    fn add(ledger: &mut Ledger<MemoryStore, SequentialIds>, amount: &str, category: &str, date: &str) {
        let values = ledger.form_mut().values_mut();
        values.amount = amount.to_string();
        values.category = category.to_string();
        values.date = date.to_string();
        ledger.submit(today()).unwrap();
    }

    #[test]
    fn test_default_criteria_is_this_month() {
        let l = ledger();
        assert_eq!(l.criteria(), &Criteria::this_month(today()));
    }

    #[test]
    fn test_view_follows_store_and_criteria() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        add(&mut l, "5", "Food", "2024-01-01");
        add(&mut l, "99", "Housing", "2023-12-01");

        let v = l.view();
        assert_eq!(v.count(), 2);
        assert_eq!(v.total(), Amount::from_str("15").unwrap());
        assert_eq!(v.top_category(), Some("Food"));

        l.set_criteria(Criteria::all());
        assert_eq!(l.view().count(), 3);
        assert_eq!(l.view().top_category(), Some("Housing"));
    }

    #[test]
    fn test_import_replaces_store() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        let report = l
            .import(r#"[{"amount": 3, "date": "2024-01-02"}, {"amount": "x", "date": "2024-01-02"}]"#)
            .unwrap();
        assert_eq!(
            report,
            ImportReport {
                kept: 1,
                dropped: 1,
                replaced: 1
            }
        );
        assert_eq!(l.store().len(), 1);
        assert_eq!(l.store().records()[0].amount(), Amount::from_str("3").unwrap());
    }

    #[test]
    fn test_failed_import_leaves_store_unchanged() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        let before = l.store().records().to_vec();
        let persisted = l.store().blob().get(STORAGE_KEY).unwrap();

        assert!(l.import(r#"{"a":1}"#).is_err());
        assert!(l.import("not json").is_err());

        assert_eq!(l.store().records(), before.as_slice());
        assert_eq!(l.store().blob().get(STORAGE_KEY).unwrap(), persisted);
    }

    #[test]
    fn test_import_of_non_numeric_amount_empties_store() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        l.import(r#"[{"amount":"x","date":"2024-01-01"}]"#).unwrap();
        assert!(l.store().is_empty());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        add(&mut l, "2.75", "Transport", "2024-01-07");
        let before = l.store().records().to_vec();
        let doc = l.export().unwrap();
        l.import(&doc).unwrap();
        assert_eq!(l.store().records(), before.as_slice());
    }

    #[test]
    fn test_edit_through_ledger() {
        let mut l = ledger();
        add(&mut l, "10", "Food", "2024-01-05");
        assert!(l.start_edit("id-1"));
        l.form_mut().values_mut().note = "  groceries ".to_string();
        assert_eq!(
            l.submit(today()).unwrap(),
            Submission::Updated("id-1".to_string())
        );
        assert_eq!(l.store().get("id-1").unwrap().note(), "groceries");
    }

    #[tokio::test]
    async fn test_read_import() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.json");
        tokio::fs::write(&path, "[]").await.unwrap();
        assert_eq!(read_import(&path).await.unwrap(), "[]");
        assert!(read_import(&dir.path().join("missing.json")).await.is_err());
    }
}
