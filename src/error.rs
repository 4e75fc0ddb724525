//! Error types shared by the library and the `expenses` binary.
//!
//! Internally everything is an `anyhow::Error`. Public command entry points additionally tag their
//! failures with an [`ErrorType`] so that callers can tell a broken data home apart from a bad
//! import file without parsing messages.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of a failure returned from a command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The data home or its `config.json` is missing or invalid.
    Config,
    /// Reading or writing the persisted record list failed.
    Storage,
    /// An import file could not be read or was not a JSON array.
    Import,
    /// The export document could not be produced or written.
    Export,
    /// The request itself could not be carried out, e.g. an unknown record id.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// Finds the `ErrorType` that a command attached to `error`, if any.
    pub fn of(error: &Error) -> Option<ErrorType> {
        error.downcast_ref::<ErrorType>().copied()
    }

    /// Creates an error of this type with `message`.
    pub(crate) fn error(self, message: impl Into<String>) -> Error {
        Error::msg(message.into()).context(self)
    }
}

/// Converts an internal result into a public one by tagging the error with an [`ErrorType`].
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}
