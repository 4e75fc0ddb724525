//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{utils, Config, Result};

/// Deletes the expense with the given id.
///
/// # Errors
///
/// - Returns a `Request` error if there is no expense with the id.
/// - Returns a `Storage` error if the expense list cannot be written.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<String>> {
    let mut ledger = config.ledger(utils::today());
    if !ledger.delete(&args.id).pub_result(ErrorType::Storage)? {
        return Err(ErrorType::Request.error(format!("No expense with id '{}'", args.id)));
    }
    Ok(Out::new(format!("Deleted expense {}", args.id), args.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::new().await;
        let keep = env.add("1", Category::Food, "", "2024-01-01");
        let before = env.records();
        let gone = env.add("2", Category::Food, "", "2024-01-02");

        let out = delete(env.config(), DeleteArgs::new(&gone)).await.unwrap();
        assert_eq!(out.structure().unwrap(), &gone);
        assert_eq!(env.records(), before);
        assert_eq!(env.records()[0].id(), keep);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let env = TestEnv::new().await;
        let err = delete(env.config(), DeleteArgs::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Request));
    }
}
