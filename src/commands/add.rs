//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::form::{FormValues, Submission};
use crate::model::Expense;
use crate::{utils, Config, Result};

/// Records a new expense through the form, which assigns it a fresh id.
///
/// # Errors
///
/// - Returns a `Request` error if the amount is not a positive number. Nothing is stored.
/// - Returns a `Storage` error if the expense list cannot be written.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Expense>> {
    let today = utils::today();
    let mut ledger = config.ledger(today);
    let amount = args.amount.clone();
    ledger.form_mut().set_values(FormValues {
        amount: args.amount,
        category: args.category.to_string(),
        note: args.note,
        date: args.date.map(|d| d.to_string()).unwrap_or_default(),
    });

    match ledger.submit(today).pub_result(ErrorType::Storage)? {
        Submission::Added(id) => {
            let expense = ledger
                .store()
                .get(&id)
                .cloned()
                .ok_or_else(|| ErrorType::Storage.error(format!("Expense '{id}' was not stored")))?;
            Ok(Out::new(format!("Added {expense}"), expense))
        }
        Submission::Rejected => Err(ErrorType::Request.error(format!(
            "The amount '{amount}' is not a number greater than zero, nothing was added"
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
    async fn test_add() {
        let env = TestEnv::new().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        let args = AddArgs::new("12.5", Category::Food, "  lunch ", date);

        let out = add(env.config(), args).await.unwrap();
        let expense = out.structure().unwrap();
        assert_eq!(expense.amount(), Amount::from_str("12.5").unwrap());
        assert_eq!(expense.category(), "Food");
        assert_eq!(expense.note(), "lunch");
        assert_eq!(expense.date(), "2024-01-05");
        assert!(out.message().starts_with("Added 2024-01-05"));

        let stored = env.records();
        assert_eq!(stored, vec![expense.clone()]);
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() {
        let env = TestEnv::new().await;
        let out = add(env.config(), AddArgs::new("3", Category::General, "", None))
            .await
            .unwrap();
        let expected = utils::today().to_string();
        assert_eq!(out.structure().unwrap().date(), expected);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_amounts() {
        let env = TestEnv::new().await;
        for amount in ["0", "-5", "twelve"] {
            let args = AddArgs::new(amount, Category::Food, "", None);
            let err = add(env.config(), args).await.unwrap_err();
            assert_eq!(ErrorType::of(&err), Some(ErrorType::Request));
        }
        assert!(env.records().is_empty());
    }
}
