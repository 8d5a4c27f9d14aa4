use crate::error::{Result, ScanError};
use crate::item::CatalogItem;
use crate::selectors;
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

/// Parse every product card on a catalog page, in document order.
///
/// Item links are resolved against `page_url`, so the `../` traversal in
/// the markup never reaches the returned link. A card missing its title,
/// price or link aborts the whole parse.
pub fn parse_catalog(html: &str, page_url: &Url) -> Result<Vec<CatalogItem>> {
    let document = Html::parse_document(html);

    let items = document
        .select(&selectors::PRODUCT_CARD)
        .enumerate()
        .map(|(idx, card)| parse_card(card, page_url, idx + 1))
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} items from {}", items.len(), page_url);
    Ok(items)
}

fn parse_card(card: ElementRef<'_>, page_url: &Url, position: usize) -> Result<CatalogItem> {
    let anchor = card
        .select(&selectors::PRODUCT_TITLE)
        .next()
        .ok_or_else(|| missing(position, "title link"))?;

    let title = anchor
        .value()
        .attr("title")
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| missing(position, "title"))?;

    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| missing(position, "link"))?;

    let raw_price = card
        .select(&selectors::PRODUCT_PRICE)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| missing(position, "price"))?;

    let price = parse_price(&raw_price)
        .map_err(|e| ScanError::ParseError(format!("product {}: {}", position, e)))?;
    let link = resolve_item_link(page_url, href)?;

    Ok(CatalogItem::new(title, price, link))
}

fn missing(position: usize, field: &str) -> ScanError {
    ScanError::ParseError(format!("product {}: missing {}", position, field))
}

/// Strip the currency symbol and parse the remaining amount, e.g. `£12.99`.
pub fn parse_price(raw: &str) -> Result<f64> {
    let amount = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.')
        .trim_end();

    amount
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| ScanError::ParseError(format!("invalid price '{}'", raw.trim())))
}

/// Resolve a card's relative href into an absolute URL.
pub fn resolve_item_link(page_url: &Url, href: &str) -> Result<String> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ScanError::ParseError("empty item link".to_string()));
    }

    page_url
        .join(href)
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", href, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://books.toscrape.com/";

    fn base() -> Url {
        Url::parse(BASE).unwrap()
    }

    fn card(title: &str, href: &str, price: &str) -> String {
        format!(
            r#"<article class="product_pod">
                <h3><a title="{title}" href="{href}">{title}</a></h3>
                <div class="product_price"><p class="price_color">{price}</p></div>
            </article>"#
        )
    }

    #[test]
    fn test_parse_single_item() {
        let html = format!(
            "<html><body>{}</body></html>",
            card("Test Book", "../../../catalogue/test-book_1/index.html", "£12.99")
        );

        let items = parse_catalog(&html, &base()).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Test Book");
        assert_eq!(items[0].price, 12.99);
        assert_eq!(
            items[0].link,
            format!("{}catalogue/test-book_1/index.html", BASE)
        );
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            card("Book One", "../../../catalogue/book-one_1/index.html", "£10.00"),
            card("Book Two", "../../../catalogue/book-two_2/index.html", "£20.99"),
            card("Book Three", "../../../catalogue/book-three_3/index.html", "£5.25"),
        );

        let items = parse_catalog(&html, &base()).unwrap();

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Book One", "Book Two", "Book Three"]);
        assert_eq!(items[1].price, 20.99);
        assert_eq!(items[2].link, format!("{}catalogue/book-three_3/index.html", BASE));
    }

    #[test]
    fn test_category_page_links_resolve_to_catalogue() {
        let page =
            Url::parse("https://books.toscrape.com/catalogue/category/books/travel_2/index.html")
                .unwrap();
        let html = card(
            "It's Only the Himalayas",
            "../../../its-only-the-himalayas_981/index.html",
            "£45.17",
        );

        let items = parse_catalog(&html, &page).unwrap();

        assert_eq!(
            items[0].link,
            "https://books.toscrape.com/catalogue/its-only-the-himalayas_981/index.html"
        );
    }

    #[test]
    fn test_title_is_not_renormalized() {
        let html = card("  Spaced   Title ", "a_1/index.html", "£1.00");
        let items = parse_catalog(&html, &base()).unwrap();
        assert_eq!(items[0].title, "  Spaced   Title ");
    }

    #[test]
    fn test_no_items_is_empty() {
        let html = "<html><body><div>No books found</div></body></html>";
        assert!(parse_catalog(html, &base()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_price_aborts_parse() {
        let html = format!(
            "{}{}",
            card("Good", "good_1/index.html", "£3.00"),
            card("Bad", "bad_2/index.html", "£N/A"),
        );

        let err = parse_catalog(&html, &base()).unwrap_err();
        assert!(matches!(err, ScanError::ParseError(ref msg) if msg.contains("product 2")));
    }

    #[test]
    fn test_missing_fields_abort_parse() {
        let no_price = r#"<article class="product_pod"><h3><a title="T" href="t/index.html">T</a></h3></article>"#;
        let err = parse_catalog(no_price, &base()).unwrap_err();
        assert!(err.to_string().contains("missing price"));

        let no_title = r#"<article class="product_pod"><h3><a href="t/index.html">T</a></h3><p class="price_color">£1.00</p></article>"#;
        let err = parse_catalog(no_title, &base()).unwrap_err();
        assert!(err.to_string().contains("missing title"));

        let no_link = r#"<article class="product_pod"><h3><a title="T">T</a></h3><p class="price_color">£1.00</p></article>"#;
        let err = parse_catalog(no_link, &base()).unwrap_err();
        assert!(err.to_string().contains("missing link"));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("£12.99").unwrap(), 12.99);
        assert_eq!(parse_price("  £51.77\n").unwrap(), 51.77);
        // Mis-decoded pound sign as served without a charset
        assert_eq!(parse_price("Â£7.50").unwrap(), 7.5);
        assert_eq!(parse_price("$3").unwrap(), 3.0);
        assert_eq!(parse_price("£.99").unwrap(), 0.99);
        assert!(parse_price("£").is_err());
        assert!(parse_price("£.").is_err());
        assert!(parse_price("free").is_err());
    }
}
