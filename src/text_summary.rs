//! Text rendering of the menu for `--text` mode.

use food_dashboard::model::FoodItem;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build one line per food item plus a trailing count.
pub(crate) fn build_text_summary(foods: &[FoodItem]) -> TextSummary {
    let name_width = foods
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut lines = Vec::with_capacity(foods.len() + 2);
    lines.push(format!(
        "{:>5}  {:<name_width$}  {:>9}  {}",
        "Id", "Name", "Price", "Status"
    ));
    for f in foods {
        let status = if f.available { "available" } else { "unavailable" };
        lines.push(format!(
            "{:>5}  {:<name_width$}  {:>9}  {}",
            f.id, f.name, f.price, status
        ));
        let description = f.description.trim();
        if !description.is_empty() {
            lines.push(format!("{:>5}  {}", "", description));
        }
    }
    let available = foods.iter().filter(|f| f.available).count();
    lines.push(format!("{} item(s), {} available", foods.len(), available));

    TextSummary { lines }
}
