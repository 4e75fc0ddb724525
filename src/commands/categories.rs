use crate::commands::Out;
use crate::model::Category;
use crate::Result;

/// Lists the categories that can be chosen when adding or editing an expense.
pub async fn categories() -> Result<Out<Vec<String>>> {
    let names: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    Ok(Out::new(names.join("\n"), names))
}
