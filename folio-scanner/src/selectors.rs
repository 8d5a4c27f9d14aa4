//! CSS selectors for the storefront markup.
//!
//! The storefront's layout is outside our control; when it changes, these
//! are the only strings that should need updating.

use scraper::Selector;
use std::sync::LazyLock;

/// Genre links in the secondary navigation list.
pub static GENRE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.nav-list ul > li > a").unwrap());

/// One product card in a catalog listing.
pub static PRODUCT_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.product_pod").unwrap());

/// Title-bearing anchor inside a product card.
pub static PRODUCT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3 > a").unwrap());

/// Currency-prefixed price inside a product card.
pub static PRODUCT_PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".price_color").unwrap());
