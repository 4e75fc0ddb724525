//! Record, filter, summarize, import and export personal expenses.
//!
//! The expense list lives in a [`store::Store`] backed by a key-value [`store::BlobStore`]. A
//! [`Ledger`] owns the store together with the add/edit [`form::Form`] and the filter
//! [`view::Criteria`]; [`view::view`] derives the filtered, sorted and summarized projection.
//! [`codec`] converts the list to and from a JSON document.

pub mod args;
mod backup;
pub mod codec;
pub mod commands;
mod config;
mod error;
pub mod form;
mod fs;
pub mod ids;
pub mod ledger;
pub mod model;
pub mod store;
mod utils;
pub mod view;

#[cfg(test)]
mod test;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use ledger::{ImportReport, Ledger};
