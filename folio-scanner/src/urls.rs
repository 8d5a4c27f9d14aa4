use crate::error::{Result, ScanError};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://books.toscrape.com/";

/// Parse the storefront base URL, making sure it ends with `/` so relative
/// joins land underneath it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw,
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// `<base>catalogue/category/books/<slug>/index.html`
pub fn category_url(base: &Url, slug: &str) -> Result<String> {
    base.join(&format!("catalogue/category/books/{}/index.html", slug))
        .map(|url| url.to_string())
        .map_err(|e| ScanError::InvalidUrl(format!("category '{}': {}", slug, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("https://books.toscrape.com").unwrap();
        assert_eq!(url.as_str(), "https://books.toscrape.com/");

        let url = parse_base_url("http://127.0.0.1:8000/store").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/store/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ScanError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_base_url("ftp://books.toscrape.com/"),
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_category_url() {
        let base = parse_base_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            category_url(&base, "fiction_10").unwrap(),
            "https://books.toscrape.com/catalogue/category/books/fiction_10/index.html"
        );

        let base = parse_base_url("http://localhost:9000/store/").unwrap();
        assert_eq!(
            category_url(&base, "travel_2").unwrap(),
            "http://localhost:9000/store/catalogue/category/books/travel_2/index.html"
        );
    }
}
