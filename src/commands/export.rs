//! Export command handler.

use crate::args::ExportArgs;
use crate::commands::{count, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{utils, Config, Result};
use anyhow::Context;
use std::path::PathBuf;

/// Writes every stored expense to `args.out` as a pretty-printed JSON array.
pub async fn export(config: Config, args: ExportArgs) -> Result<Out<PathBuf>> {
    let ledger = config.ledger(utils::today());
    let json = ledger.export().pub_result(ErrorType::Export)?;
    utils::write(&args.out, json)
        .await
        .with_context(|| format!("Unable to write the export to {}", args.out.display()))
        .pub_result(ErrorType::Export)?;
    Ok(Out::new(
        format!(
            "Exported {} to {}",
            count(ledger.store().len(), "expense"),
            args.out.display()
        ),
        args.out,
    ))
}
