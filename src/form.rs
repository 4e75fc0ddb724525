//! The add/edit form controller.
//!
//! The form holds the raw text of each field and is either adding a new expense or editing an
//! existing one. Submitting validates the amount, writes to the [`Store`], and returns the form to
//! add mode. A submission with an amount that is not a positive number is rejected and nothing
//! changes.

use crate::ids::IdGenerator;
use crate::model::{date_prefix, Amount, Expense, GENERAL_STR};
use crate::store::{BlobStore, Store};
use crate::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Whether the form creates a new expense or replaces an existing one.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Add,
    /// Editing the expense with this id.
    Edit(String),
}

/// The raw field values as entered.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct FormValues {
    pub amount: String,
    pub category: String,
    pub note: String,
    pub date: String,
}

impl FormValues {
    /// Empty amount and note, the default category, and `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            amount: String::new(),
            category: GENERAL_STR.to_string(),
            note: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            amount: expense.amount.value().to_string(),
            category: expense.category.clone(),
            note: expense.note.clone(),
            date: expense.date.clone(),
        }
    }
}

/// What a call to [`Form::submit`] did.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    /// The amount was not a positive number. Nothing changed.
    Rejected,
    /// A new expense was stored with this id.
    Added(String),
    /// The expense with this id was replaced.
    Updated(String),
    /// The expense being edited no longer exists. The form was reset.
    Stale(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Form {
    values: FormValues,
    mode: Mode,
}

impl Form {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            values: FormValues::blank(today),
            mode: Mode::Add,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut FormValues {
        &mut self.values
    }

    pub fn set_values(&mut self, values: FormValues) {
        self.values = values;
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Loads the expense with `id` into the form and switches to edit mode.
    ///
    /// Returns false, leaving the form untouched, if there is no such expense.
    pub fn start_edit<B: BlobStore>(&mut self, store: &Store<B>, id: &str) -> bool {
        match store.get(id) {
            Some(expense) => {
                self.values = FormValues::from_expense(expense);
                self.mode = Mode::Edit(id.to_string());
                true
            }
            None => {
                debug!("Cannot edit '{id}', no such expense");
                false
            }
        }
    }

    /// Clears the fields and returns to add mode.
    pub fn reset(&mut self, today: NaiveDate) {
        self.values = FormValues::blank(today);
        self.mode = Mode::Add;
    }

    pub fn cancel(&mut self, today: NaiveDate) {
        self.reset(today)
    }

    /// Validates the current values and adds or replaces an expense in `store`.
    ///
    /// The note is trimmed, a blank category becomes "General", and a blank date becomes `today`.
    pub fn submit<B, I>(
        &mut self,
        store: &mut Store<B>,
        ids: &mut I,
        today: NaiveDate,
    ) -> Result<Submission>
    where
        B: BlobStore,
        I: IdGenerator,
    {
        let amount = match Amount::from_str(&self.values.amount) {
            Ok(amount) if amount.is_positive() => amount,
            _ => {
                debug!("Rejecting amount '{}'", self.values.amount);
                return Ok(Submission::Rejected);
            }
        };

        let category = match self.values.category.trim() {
            "" => GENERAL_STR.to_string(),
            c => c.to_string(),
        };
        let date = match self.values.date.trim() {
            "" => today.format("%Y-%m-%d").to_string(),
            d => date_prefix(d),
        };
        let note = self.values.note.trim().to_string();

        let submission = match &self.mode {
            Mode::Add => {
                let id = unused_id(store, ids);
                let expense = Expense::new(id.clone(), amount, category, note, date);
                if !store.add(expense)? {
                    return Ok(Submission::Rejected);
                }
                Submission::Added(id)
            }
            Mode::Edit(id) => {
                let expense = Expense::new(id.clone(), amount, category, note, date);
                if store.update(id, expense)? {
                    Submission::Updated(id.clone())
                } else {
                    Submission::Stale(id.clone())
                }
            }
        };

        self.reset(today);
        Ok(submission)
    }
}

/// Draws ids until one is not already in `store`. Imported records keep their own ids.
fn unused_id<B: BlobStore, I: IdGenerator>(store: &Store<B>, ids: &mut I) -> String {
    loop {
        let id = ids.generate_id();
        if store.get(&id).is_none() {
            return id;
        }
    }
}
