use crate::catalog::parse_catalog;
use crate::error::{Result, ScanError};
use crate::fetcher::PageFetcher;
use crate::genre::{GenreIndex, GenreSlugMap, normalize_genre, parse_genre_nav};
use crate::item::CatalogItem;
use crate::urls::{category_url, parse_base_url};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Client for one storefront: resolves genres to category pages and scrapes
/// their listings.
pub struct Storefront {
    fetcher: PageFetcher,
    base_url: Url,
    genres: Arc<GenreIndex>,
}

impl Storefront {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new()?,
            base_url: parse_base_url(base_url)?,
            genres: Arc::new(GenreIndex::new()),
        })
    }

    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Share a genre cache between storefront clients, or swap in a fresh one.
    pub fn with_genre_index(mut self, genres: Arc<GenreIndex>) -> Self {
        self.genres = genres;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn genre_index(&self) -> &Arc<GenreIndex> {
        &self.genres
    }

    /// The genre -> slug map, fetched from the storefront root on first use.
    pub async fn genre_slug_map(&self) -> Result<Arc<GenreSlugMap>> {
        self.genres
            .get_or_populate(|| async {
                info!("Building genre index from {}", self.base_url);
                let html = self.fetcher.fetch(self.base_url.as_str()).await?;
                Ok::<_, ScanError>(parse_genre_nav(&html))
            })
            .await
    }

    /// Root catalog URL when `genre` is absent or blank, otherwise the
    /// genre's category page.
    pub async fn build_url(&self, genre: Option<&str>) -> Result<String> {
        let Some(genre) = genre.filter(|g| !normalize_genre(g).is_empty()) else {
            return Ok(self.base_url.to_string());
        };

        let map = self.genre_slug_map().await?;
        match map.get(genre) {
            Some(slug) => {
                debug!("Genre '{}' resolved to {}", genre.trim(), slug);
                category_url(&self.base_url, slug)
            }
            None => Err(ScanError::GenreNotFound(genre.trim().to_string())),
        }
    }

    /// Fetch a catalog page and parse its listings.
    pub async fn scrape_catalog(&self, url: &str) -> Result<Vec<CatalogItem>> {
        let html = self.fetcher.fetch(url).await?;
        let page_url =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        parse_catalog(&html, &page_url)
    }

    /// Build the URL for `genre` and scrape it.
    pub async fn search(&self, genre: Option<&str>) -> Result<Vec<CatalogItem>> {
        let url = self.build_url(genre).await?;
        self.scrape_catalog(&url).await
    }
}
