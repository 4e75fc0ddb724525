//! Import and export of the record list as a JSON document.
//!
//! Export writes the canonical record shape. Import accepts any JSON array, keeps the entries that
//! carry a usable `amount` and `date`, and fills in everything else. An imported list replaces the
//! whole store; it is never merged.

use crate::ids::IdGenerator;
use crate::model::{date_prefix, Amount, Expense, GENERAL_STR};
use crate::Result;
use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Suggested name for an exported file.
pub const EXPORT_FILE_NAME: &str = "expenses.json";

/// MIME type of an exported file.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Serializes `records` as a pretty-printed JSON array with two-space indentation.
pub fn export(records: &[Expense]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Unable to serialize expenses for export")
}

/// The outcome of decoding an import document.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Decoded {
    pub records: Vec<Expense>,
    /// The number of array entries that were dropped.
    pub dropped: usize,
}

/// Parses `raw` into normalized records.
///
/// Fails if `raw` is not JSON or its top-level value is not an array. Otherwise every entry that is
/// an object with a numeric, positive `amount` and a string `date` is kept:
/// - `id` is kept if it is a non-empty string or a number not already used earlier in the
///   document, otherwise a fresh one is generated
/// - `category` is kept if it is a non-empty string, otherwise "General"
/// - `note` is kept if it is a string, otherwise empty
/// - `date` is cut to its first ten characters, dropping any time of day
pub fn import<I: IdGenerator>(raw: &str, ids: &mut I) -> Result<Decoded> {
    let value: Value = serde_json::from_str(raw).context("The import file is not valid JSON")?;
    let Value::Array(entries) = value else {
        bail!("The import file must contain a JSON array of expenses");
    };

    let total = entries.len();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(total);
    for (ix, entry) in entries.into_iter().enumerate() {
        let Value::Object(object) = entry else {
            debug!("Dropping entry {ix}: not an object");
            continue;
        };
        match normalize(&object, ids, &mut seen) {
            Some(record) => records.push(record),
            None => debug!("Dropping entry {ix}: missing a positive amount or a date"),
        }
    }

    let dropped = total - records.len();
    Ok(Decoded { records, dropped })
}

fn normalize<I: IdGenerator>(
    object: &Map<String, Value>,
    ids: &mut I,
    seen: &mut HashSet<String>,
) -> Option<Expense> {
    let amount = match object.get("amount") {
        Some(n @ Value::Number(_)) => serde_json::from_value::<Amount>(n.clone()).ok()?,
        _ => return None,
    };
    if !amount.is_positive() {
        return None;
    }
    let date = match object.get("date") {
        Some(Value::String(d)) => date_prefix(d),
        _ => return None,
    };

    let id = match object.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
    .filter(|id| !seen.contains(id))
    .unwrap_or_else(|| fresh_id(ids, seen));
    seen.insert(id.clone());

    let category = match object.get("category") {
        Some(Value::String(c)) if !c.is_empty() => c.clone(),
        _ => GENERAL_STR.to_string(),
    };
    let note = match object.get("note") {
        Some(Value::String(n)) => n.clone(),
        _ => String::new(),
    };

    Some(Expense::new(id, amount, category, note, date))
}

fn fresh_id<I: IdGenerator>(ids: &mut I, seen: &HashSet<String>) -> String {
    loop {
        let id = ids.generate_id();
        if !seen.contains(&id) {
            return id;
        }
    }
}
