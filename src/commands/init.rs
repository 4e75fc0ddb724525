use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the data home, its `.backups` directory and an initial `config.json`.
///
/// # Errors
/// - Returns an error if the data home already has a `config.json`.
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path) -> Result<Out<PathBuf>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data home and config")
        .pub_result(ErrorType::Config)?;
    let root = config.root().to_path_buf();
    Ok(Out::new(
        format!("Successfully created the expenses data home at {}", root.display()),
        root,
    ))
}
