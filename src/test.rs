//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::form::{FormValues, Submission};
use crate::model::{Category, Expense};
use crate::{utils, Config};
use std::path::Path;
use tempfile::TempDir;

/// Test environment that sets up an expenses data home with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with an initialized data home.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let config = Config::create(&root).await.unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A scratch directory outside the data home.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Adds an expense through the form of a freshly loaded ledger and returns its id.
    pub fn add(&self, amount: &str, category: Category, note: &str, date: &str) -> String {
        let today = utils::today();
        let mut ledger = self.config.ledger(today);
        ledger.form_mut().set_values(FormValues {
            amount: amount.to_string(),
            category: category.to_string(),
            note: note.to_string(),
            date: date.to_string(),
        });
        match ledger.submit(today).unwrap() {
            Submission::Added(id) => id,
            other => panic!("Expected the expense to be added, got {other:?}"),
        }
    }

    /// The expenses as currently persisted in the data home.
    pub fn records(&self) -> Vec<Expense> {
        self.config
            .ledger(utils::today())
            .store()
            .records()
            .to_vec()
    }
}
