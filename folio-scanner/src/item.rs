use serde::{Deserialize, Serialize};

/// One listing scraped from a catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub price: f64,
    pub link: String,
}

impl CatalogItem {
    pub fn new(title: impl Into<String>, price: f64, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            link: link.into(),
        }
    }

    pub fn within_limit(&self, price_limit: Option<f64>) -> bool {
        price_limit.is_none_or(|limit| self.price <= limit)
    }
}
