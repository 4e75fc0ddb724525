//! Edit command handler.

use crate::args::EditArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::form::Submission;
use crate::model::Expense;
use crate::{utils, Config, Result};

/// Loads an expense into the form, overrides the fields given in `args`, and submits it.
///
/// The expense keeps its id and its position in the list.
///
/// # Errors
///
/// - Returns a `Request` error if there is no expense with the id, or the new amount is not a
///   positive number.
/// - Returns a `Storage` error if the expense list cannot be written.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Expense>> {
    let today = utils::today();
    let mut ledger = config.ledger(today);
    if !ledger.start_edit(&args.id) {
        return Err(ErrorType::Request.error(format!("No expense with id '{}'", args.id)));
    }

    let values = ledger.form_mut().values_mut();
    if let Some(amount) = args.amount {
        values.amount = amount;
    }
    if let Some(category) = args.category {
        values.category = category.to_string();
    }
    if let Some(note) = args.note {
        values.note = note;
    }
    if let Some(date) = args.date {
        values.date = date.to_string();
    }
    let amount = values.amount.clone();

    match ledger.submit(today).pub_result(ErrorType::Storage)? {
        Submission::Updated(id) => {
            let expense = ledger
                .store()
                .get(&id)
                .cloned()
                .ok_or_else(|| ErrorType::Storage.error(format!("Expense '{id}' was not stored")))?;
            Ok(Out::new(format!("Updated {expense}"), expense))
        }
        Submission::Rejected => Err(ErrorType::Request.error(format!(
            "The amount '{amount}' is not a number greater than zero, nothing was changed"
        ))),
        other => Err(ErrorType::Request.error(format!("Unexpected result {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_edit_some_fields() {
        let env = TestEnv::new().await;
        let first = env.add("10", Category::Food, "bread", "2024-01-05");
        let second = env.add("20", Category::Health, "", "2024-01-06");

        let args = EditArgs::new(&first)
            .amount("11.25")
            .category(Category::Shopping);
        let out = edit(env.config(), args).await.unwrap();
        let expense = out.structure().unwrap();
        assert_eq!(expense.id(), first);
        assert_eq!(expense.amount(), Amount::from_str("11.25").unwrap());
        assert_eq!(expense.category(), "Shopping");
        assert_eq!(expense.note(), "bread");
        assert_eq!(expense.date(), "2024-01-05");

        let ids: Vec<String> = env.records().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_edit_date_and_note() {
        let env = TestEnv::new().await;
        let id = env.add("10", Category::Food, "bread", "2024-01-05");
        let args = EditArgs::new(&id)
            .note("")
            .date(NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());
        let out = edit(env.config(), args).await.unwrap();
        assert_eq!(out.structure().unwrap().note(), "");
        assert_eq!(out.structure().unwrap().date(), "2023-11-30");
    }

    #[tokio::test]
    async fn test_edit_missing() {
        let env = TestEnv::new().await;
        let err = edit(env.config(), EditArgs::new("nope").amount("1"))
            .await
            .unwrap_err();
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Request));
    }

    #[tokio::test]
    async fn test_edit_bad_amount_changes_nothing() {
        let env = TestEnv::new().await;
        let id = env.add("10", Category::Food, "", "2024-01-05");
        let before = env.records();
        let err = edit(env.config(), EditArgs::new(&id).amount("-1"))
            .await
            .unwrap_err();
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Request));
        assert_eq!(env.records(), before);
    }
}
