//! Filtering and aggregation of the record list.
//!
//! [`view`] is a pure function of the records and the [`Criteria`]; callers re-derive it whenever
//! either changes.

use crate::model::{Amount, Expense};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// Shown in place of the top category when a view has no rows.
pub const NO_CATEGORY: &str = "?";

/// The active filter parameters. Unset fields do not filter.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct Criteria {
    /// Inclusive lower bound on the record date.
    from: Option<NaiveDate>,
    /// Inclusive upper bound on the record date.
    to: Option<NaiveDate>,
    /// Case-insensitive substring searched for in the note and category.
    query: String,
    /// Exact category name.
    category: Option<String>,
}

impl Criteria {
    /// Criteria that keep every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// The default criteria: the calendar month containing `today`, no query, any category.
    pub fn this_month(today: NaiveDate) -> Self {
        let (first, last) = month_bounds(today);
        Self {
            from: Some(first),
            to: Some(last),
            ..Self::default()
        }
    }

    pub fn with_from(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: Option<NaiveDate>) -> Self {
        self.to = to;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the category filter. An empty name means any category.
    pub fn with_category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into).filter(|c| !c.is_empty());
        self
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns true if `record` passes all four filters.
    pub fn matches(&self, record: &Expense) -> bool {
        Prepared::new(self).matches(record)
    }
}

/// Criteria with the bounds rendered as ISO strings and the query lowercased, so that a whole list
/// can be filtered without re-formatting per record.
struct Prepared<'c> {
    from: Option<String>,
    to: Option<String>,
    query: String,
    category: Option<&'c str>,
}

impl<'c> Prepared<'c> {
    fn new(criteria: &'c Criteria) -> Self {
        Self {
            from: criteria.from.map(iso),
            to: criteria.to.map(iso),
            query: criteria.query.to_lowercase(),
            category: criteria.category(),
        }
    }

    fn matches(&self, record: &Expense) -> bool {
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        if !self.query.is_empty() && !record.search_text().contains(&self.query) {
            return false;
        }
        // ISO dates are zero padded, so string order is date order.
        if let Some(from) = &self.from {
            if record.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if record.date.as_str() > to.as_str() {
                return false;
            }
        }
        true
    }
}

/// The filtered, sorted and aggregated projection of a record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<'a> {
    rows: Vec<&'a Expense>,
    total: Amount,
    subtotals: Vec<(String, Amount)>,
    top_category: Option<String>,
}

impl<'a> View<'a> {
    /// Matching records, newest date first.
    pub fn rows(&self) -> &[&'a Expense] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Per-category sums over the rows, in the order each category first appears in `rows`.
    pub fn subtotals(&self) -> &[(String, Amount)] {
        &self.subtotals
    }

    /// The category with the largest subtotal, `None` when there are no rows.
    pub fn top_category(&self) -> Option<&str> {
        self.top_category.as_deref()
    }

    /// The top category, or [`NO_CATEGORY`] when there are no rows.
    pub fn top_category_label(&self) -> &str {
        self.top_category().unwrap_or(NO_CATEGORY)
    }
}

/// Computes the view of `records` under `criteria`.
///
/// Rows are sorted by date, newest first; records with the same date keep their relative order.
/// When two categories tie for the largest subtotal the one seen first in `rows` wins.
pub fn view<'a>(records: &'a [Expense], criteria: &Criteria) -> View<'a> {
    let prepared = Prepared::new(criteria);
    let mut rows: Vec<&Expense> = records.iter().filter(|r| prepared.matches(r)).collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let total = rows.iter().map(|r| r.amount).sum();

    let mut subtotals: Vec<(String, Amount)> = Vec::new();
    for row in &rows {
        match subtotals.iter_mut().find(|(c, _)| *c == row.category) {
            Some((_, sum)) => *sum += row.amount,
            None => subtotals.push((row.category.clone(), row.amount)),
        }
    }

    let mut top: Option<&(String, Amount)> = None;
    for entry in &subtotals {
        match top {
            Some((_, best)) if entry.1 <= *best => {}
            _ => top = Some(entry),
        }
    }
    let top_category = top.map(|(c, _)| c.clone());

    View {
        rows,
        total,
        subtotals,
        top_category,
    }
}

/// The first and last calendar day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day - Days::new(u64::from(day.day0()));
    let last = first + Months::new(1) - Days::new(1);
    (first, last)
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
