//! Price filtering and the plain-text listing sent back as fulfillment

use folio_scanner::CatalogItem;

pub const NO_RESULTS_MESSAGE: &str = "Sorry, no books found matching your criteria.";
pub const RESULTS_HEADER: &str = "Here are some books for you:";

/// Keep items priced at or under `price_limit`, preserving order.
pub fn filter_by_price(items: Vec<CatalogItem>, price_limit: Option<f64>) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(|item| item.within_limit(price_limit))
        .collect()
}

/// Filter `items` and render them as a numbered list, or the no-results
/// sentence when nothing is left.
pub fn format_results(items: &[CatalogItem], price_limit: Option<f64>) -> String {
    let filtered: Vec<&CatalogItem> = items
        .iter()
        .filter(|item| item.within_limit(price_limit))
        .collect();

    if filtered.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut report = String::from(RESULTS_HEADER);
    for (idx, item) in filtered.iter().enumerate() {
        report.push('\n');
        report.push_str(&format_line(idx + 1, item));
    }

    report
}

fn format_line(position: usize, item: &CatalogItem) -> String {
    format!(
        "{}. {} - ${:.2} - {}",
        position, item.title, item.price, item.link
    )
}
