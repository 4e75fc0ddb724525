//! List command handler.

use crate::args::ListArgs;
use crate::commands::{count, Out};
use crate::model::{Amount, Expense};
use crate::view::Criteria;
use crate::{utils, Config, Result};
use serde::Serialize;
use std::fmt::Write;

/// The filtered expenses and their summary, as produced by `expenses list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub criteria: Criteria,
    pub rows: Vec<Expense>,
    pub count: usize,
    pub total: Amount,
    pub subtotals: Vec<(String, Amount)>,
    pub top_category: String,
}

/// Lists the expenses matching `args`, newest first, followed by a summary line.
///
/// The dates default to the current month unless `--all` is given. `--from` and `--to` override
/// either bound.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Listing>> {
    let today = utils::today();
    let mut ledger = config.ledger(today);
    ledger.set_criteria(criteria(&args, today));

    let view = ledger.view();
    let listing = Listing {
        criteria: ledger.criteria().clone(),
        rows: view.rows().iter().map(|&r| r.clone()).collect(),
        count: view.count(),
        total: view.total(),
        subtotals: view.subtotals().to_vec(),
        top_category: view.top_category_label().to_string(),
    };

    let mut message = String::new();
    for row in &listing.rows {
        let _ = writeln!(message, "{row}");
    }
    let _ = write!(
        message,
        "{}, total {}, top category {}",
        count(listing.count, "expense"),
        listing.total,
        listing.top_category
    );
    Ok(Out::new(message, listing))
}

fn criteria(args: &ListArgs, today: chrono::NaiveDate) -> Criteria {
    let mut criteria = if args.all {
        Criteria::all()
    } else {
        Criteria::this_month(today)
    };
    if args.from.is_some() {
        criteria = criteria.with_from(args.from);
    }
    if args.to.is_some() {
        criteria = criteria.with_to(args.to);
    }
    criteria
        .with_query(args.query.as_str())
        .with_category(args.category.as_deref())
}
