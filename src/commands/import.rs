//! Import command handler.

use crate::args::ImportArgs;
use crate::backup::PRE_IMPORT;
use crate::commands::{count, Out};
use crate::error::{ErrorType, IntoResult};
use crate::ledger::read_import;
use crate::{utils, Config, ImportReport, Result};
use tracing::{info, warn};

/// Replaces all stored expenses with the contents of the JSON file at `args.file`.
///
/// The current expenses are backed up to the `.backups` directory first. If the file is not a
/// JSON array nothing is changed and no backup is written.
///
/// # Errors
///
/// - Returns an `Import` error if the file cannot be read or is not a JSON array.
/// - Returns a `Storage` error if the backup or the new expense list cannot be written.
pub async fn import(config: Config, args: ImportArgs) -> Result<Out<ImportReport>> {
    let raw = read_import(&args.file).await.pub_result(ErrorType::Import)?;
    let mut ledger = config.ledger(utils::today());
    let decoded = ledger.decode_import(&raw).pub_result(ErrorType::Import)?;

    if !ledger.store().is_empty() {
        warn!(
            "Importing {} replaces all {} currently stored",
            args.file.display(),
            count(ledger.store().len(), "expense")
        );
        let path = config
            .backup()
            .save_json(PRE_IMPORT, ledger.store().records())
            .await
            .pub_result(ErrorType::Storage)?;
        info!("Backed up the current expenses to {}", path.display());
    }

    let report = ledger.apply_import(decoded).pub_result(ErrorType::Storage)?;
    Ok(Out::new(
        format!(
            "Imported {} from {}, dropped {} invalid {}",
            count(report.kept, "expense"),
            args.file.display(),
            report.dropped,
            if report.dropped == 1 { "entry" } else { "entries" }
        ),
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_import_replaces_and_backs_up() {
        let env = TestEnv::new().await;
        env.add("1", Category::Food, "old", "2023-12-31");
        let file = env.dir().join("in.json");
        std::fs::write(
            &file,
            r#"[
                {"id": 7, "amount": 4.5, "date": "2024-01-05T10:00:00Z"},
                {"amount": "3", "date": "2024-01-06"},
                null
            ]"#,
        )
        .unwrap();

        let out = import(env.config(), ImportArgs::new(&file)).await.unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &ImportReport {
                kept: 1,
                dropped: 2,
                replaced: 1
            }
        );

        let records = env.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "7");
        assert_eq!(records[0].category(), "General");
        assert_eq!(records[0].note(), "");
        assert_eq!(records[0].date(), "2024-01-05");

        let backups: Vec<_> = std::fs::read_dir(env.config().backups())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("pre-import."));
    }

    #[tokio::test]
    async fn test_import_of_object_changes_nothing() {
        let env = TestEnv::new().await;
        env.add("1", Category::Food, "old", "2023-12-31");
        let before = env.records();
        let file = env.dir().join("in.json");
        std::fs::write(&file, r#"{"a":1}"#).unwrap();

        for _ in 0..3 {
            let err = import(env.config(), ImportArgs::new(&file)).await.unwrap_err();
            assert_eq!(ErrorType::of(&err), Some(ErrorType::Import));
        }
        assert_eq!(env.records(), before);
        assert_eq!(std::fs::read_dir(env.config().backups()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let env = TestEnv::new().await;
        let err = import(env.config(), ImportArgs::new(env.dir().join("nope.json")))
            .await
            .unwrap_err();
        assert_eq!(ErrorType::of(&err), Some(ErrorType::Import));
    }

    #[tokio::test]
    async fn test_import_into_empty_store_skips_backup() {
        let env = TestEnv::new().await;
        let file = env.dir().join("in.json");
        std::fs::write(&file, "[]").unwrap();
        import(env.config(), ImportArgs::new(&file)).await.unwrap();
        assert_eq!(std::fs::read_dir(env.config().backups()).unwrap().count(), 0);
    }
}
