//! These structs provide the CLI interface for the expenses CLI.

use crate::model::Category;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for keeping track of what you spend.
///
/// Expenses are stored locally in a data home directory. You can add, edit and delete them, list
/// them with filters and a summary, and move them in and out as a JSON file.
///
/// Run `expenses init` once to create the data home.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data home directory and its configuration file.
    Init,
    /// Record a new expense.
    Add(AddArgs),
    /// Change an existing expense. Fields that are not given keep their current value.
    Edit(EditArgs),
    /// Delete an expense.
    Delete(DeleteArgs),
    /// List expenses with a summary. By default only the current month is shown.
    List(ListArgs),
    /// Write all expenses to a JSON file.
    Export(ExportArgs),
    /// Replace ALL stored expenses with the contents of a JSON file.
    ///
    /// This is destructive: the current expenses are not merged with the file, they are discarded.
    /// A backup of them is written to the `.backups` directory of the data home first.
    Import(ImportArgs),
    /// Show the categories that can be chosen when adding or editing.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expense data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount spent, e.g. 12.50 or $1,200. Must be greater than zero.
    #[arg(long)]
    pub(crate) amount: String,

    #[arg(long, value_enum, default_value_t = Category::General)]
    pub(crate) category: Category,

    /// A free-text note.
    #[arg(long, default_value = "")]
    pub(crate) note: String,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub(crate) date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn new(
        amount: impl Into<String>,
        category: Category,
        note: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category,
            note: note.into(),
            date,
        }
    }
}

/// Args for the `expenses edit` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct EditArgs {
    /// The id of the expense to change.
    pub(crate) id: String,

    #[arg(long)]
    pub(crate) amount: Option<String>,

    #[arg(long, value_enum)]
    pub(crate) category: Option<Category>,

    #[arg(long)]
    pub(crate) note: Option<String>,

    #[arg(long)]
    pub(crate) date: Option<NaiveDate>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the expense to delete.
    pub(crate) id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Args for the `expenses list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only show expenses on or after this date (YYYY-MM-DD). Defaults to the first of this month.
    #[arg(long)]
    pub(crate) from: Option<NaiveDate>,

    /// Only show expenses on or before this date (YYYY-MM-DD). Defaults to the end of this month.
    #[arg(long)]
    pub(crate) to: Option<NaiveDate>,

    /// Only show expenses whose note or category contains this text, ignoring case.
    #[arg(long, default_value = "")]
    pub(crate) query: String,

    /// Only show expenses in exactly this category.
    #[arg(long)]
    pub(crate) category: Option<String>,

    /// Do not limit the dates to the current month. Explicit --from and --to still apply.
    #[arg(long)]
    pub(crate) all: bool,
}

impl ListArgs {
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Args for the `expenses export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the file.
    #[arg(long, default_value = crate::codec::EXPORT_FILE_NAME)]
    pub(crate) out: PathBuf,
}

impl ExportArgs {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self { out: out.into() }
    }
}

/// Args for the `expenses import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The JSON file to import. It must contain an array of expenses.
    pub(crate) file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSES_HOME instead of relying on the default \
                data home. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "expenses", "--home", "/tmp/x", "add", "--amount", "12.5", "--category", "food",
            "--date", "2024-01-05",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/x"));
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.amount, "12.5");
        assert_eq!(add.category, Category::Food);
        assert_eq!(add.note, "");
        assert_eq!(add.date, NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_parse_list_defaults() {
        let args = Args::try_parse_from(["expenses", "--home", "h", "list"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert!(!list.all);
        assert_eq!(list.query, "");
        assert_eq!(list.from, None);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result =
            Args::try_parse_from(["expenses", "--home", "h", "list", "--from", "January"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let result = Args::try_parse_from([
            "expenses", "--home", "h", "add", "--amount", "1", "--category", "yachts",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_log_level() {
        let args =
            Args::try_parse_from(["expenses", "--log-level", "debug", "--home", "h", "categories"])
                .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
