//! Blocking file helpers for the synchronous parts of the crate, i.e. the record store.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Reads `path` to a `String`, returning `None` when the file does not exist.
pub(crate) fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            _ => Err(e).context(format!("Unable to read file {}", path.display())),
        },
    }
}

/// Writes `data` to a sibling temp file and renames it over `path`.
pub(crate) fn write_all(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, data.as_ref())
        .context(format!("Unable to write data to {}", Path::new(&tmp).display()))?;
    std::fs::rename(&tmp, path).context(format!("Unable to replace {}", path.display()))
}

#[test]
fn read_optional_missing_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let found = read_optional(tempdir.path().join("nope.json")).unwrap();
    assert!(found.is_none());
}

#[test]
fn write_then_read_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("x.json");
    write_all(&path, "[]").unwrap();
    write_all(&path, "[1]").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[1]"));
    assert!(!tempdir.path().join("x.json.tmp").exists());
}
