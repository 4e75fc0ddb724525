use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A single expense entry.
///
/// This is also the canonical shape of one element of the persisted blob and of the export file:
///
/// ```json
/// {
///   "id": "0b7c2a4e-5d1f-4f0e-9a43-2f7f5d2c9b11",
///   "amount": 12.5,
///   "category": "Food",
///   "note": "lunch",
///   "date": "2024-01-05"
/// }
/// ```
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub(crate) id: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) note: String,
    pub(crate) date: String,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        note: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            category: category.into(),
            note: note.into(),
            date: date.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// The calendar date as `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Lowercased `note` followed by `category`, the text that free-text queries search.
    pub(crate) fn search_text(&self) -> String {
        format!("{}{}", self.note, self.category).to_lowercase()
    }
}

impl Display for Expense {
    /// One line for listings, e.g. `2024-01-05  $12.50  Food  lunch  [a1]`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {:>12}  {}", self.date, self.amount.to_string(), self.category)?;
        if !self.note.is_empty() {
            write!(f, "  {}", self.note)?;
        }
        write!(f, "  [{}]", self.id)
    }
}

/// Keeps the `YYYY-MM-DD` part of a date or date-time string.
pub(crate) fn date_prefix(s: &str) -> String {
    s.chars().take(DATE_LEN).collect()
}

const DATE_LEN: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_serialized_field_order() {
        let e = Expense::new(
            "a1",
            Amount::from_str("12.5").unwrap(),
            "Food",
            "lunch",
            "2024-01-05",
        );
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(
            json,
            r#"{"id":"a1","amount":12.5,"category":"Food","note":"lunch","date":"2024-01-05"}"#
        );
    }

    #[test]
    fn test_display() {
        let e = Expense::new("a1", Amount::from_str("12.5").unwrap(), "Food", "lunch", "2024-01-05");
        assert_eq!(e.to_string(), "2024-01-05        $12.50  Food  lunch  [a1]");
        let e = Expense::new("b2", Amount::from_str("3").unwrap(), "General", "", "2024-01-06");
        assert_eq!(e.to_string(), "2024-01-06         $3.00  General  [b2]");
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("2024-01-05T13:45:00.000Z"), "2024-01-05");
        assert_eq!(date_prefix("2024-01-05"), "2024-01-05");
        assert_eq!(date_prefix("soon"), "soon");
    }

    #[test]
    fn test_search_text() {
        let e = Expense::new("a1", Amount::default(), "Food", "Corner CAFE", "2024-01-05");
        assert_eq!(e.search_text(), "corner cafefood");
    }
}
