//! Types that represent the core data model, such as `Expense` and `Amount`.
mod amount;
mod category;
mod expense;

pub use amount::{Amount, AmountError};
pub use category::{Category, GENERAL_STR};
pub(crate) use expense::date_prefix;
pub use expense::Expense;
