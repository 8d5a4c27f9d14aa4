//! Genre navigation parsing and the process-wide genre cache.

use crate::error::Result;
use crate::selectors;
use scraper::Html;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Trim, collapse internal whitespace and lower-case a genre name.
///
/// Both the index build and every lookup go through this function; keys
/// that were normalized differently would never match.
pub fn normalize_genre(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized genre name -> category slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreSlugMap(HashMap<String, String>);

impl GenreSlugMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the normalized form of `genre`.
    pub fn insert(&mut self, genre: &str, slug: impl Into<String>) -> Option<String> {
        self.0.insert(normalize_genre(genre), slug.into())
    }

    /// Look up `genre` after normalizing it.
    pub fn get(&self, genre: &str) -> Option<&str> {
        self.0.get(&normalize_genre(genre)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries ordered by genre name, for display.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for GenreSlugMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (genre, slug) in iter {
            map.insert(genre.as_ref(), slug);
        }
        map
    }
}

/// Build the genre map from the storefront's navigation list.
///
/// Missing or empty navigation yields an empty map.
pub fn parse_genre_nav(html: &str) -> GenreSlugMap {
    let document = Html::parse_document(html);
    let mut map = GenreSlugMap::new();

    for link in document.select(&selectors::GENRE_LINK) {
        let text = link.text().collect::<String>();
        let genre = normalize_genre(&text);
        if genre.is_empty() {
            warn!("Skipping genre link with no text");
            continue;
        }

        let Some(slug) = link.value().attr("href").and_then(slug_from_href) else {
            warn!("Skipping genre '{}': no slug in href", genre);
            continue;
        };

        debug!("Found genre: {} -> {}", genre, slug);
        map.insert(&genre, slug);
    }

    map
}

/// The second-to-last path segment, e.g. `travel_2` in
/// `catalogue/category/books/travel_2/index.html`.
pub fn slug_from_href(href: &str) -> Option<&str> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    let slug = segments[segments.len() - 2].trim();
    (!slug.is_empty()).then_some(slug)
}

struct CachedMap {
    map: Arc<GenreSlugMap>,
    populated_at: Instant,
}

/// Memoized genre map.
///
/// Population is single-flight: the lock is held across the fetch, so
/// concurrent first callers wait for one result instead of each fetching.
/// Failures are not cached.
pub struct GenreIndex {
    cached: Mutex<Option<CachedMap>>,
    max_age: Option<Duration>,
}

impl GenreIndex {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
            max_age: None,
        }
    }

    /// Repopulate once the cached map is older than `max_age`.
    /// `None` keeps it until [`GenreIndex::invalidate`] is called.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Return the cached map, running `populate` if there is none yet.
    pub async fn get_or_populate<F, Fut>(&self, populate: F) -> Result<Arc<GenreSlugMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GenreSlugMap>>,
    {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref()
            && !self.is_expired(entry)
        {
            return Ok(entry.map.clone());
        }

        let map = Arc::new(populate().await?);
        info!("Genre index populated with {} genres", map.len());

        *cached = Some(CachedMap {
            map: map.clone(),
            populated_at: Instant::now(),
        });

        Ok(map)
    }

    /// Drop the cached map; the next lookup refetches.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            info!("Genre index invalidated");
        }
    }

    pub async fn is_populated(&self) -> bool {
        self.cached
            .lock()
            .await
            .as_ref()
            .is_some_and(|entry| !self.is_expired(entry))
    }

    fn is_expired(&self, entry: &CachedMap) -> bool {
        self.max_age
            .is_some_and(|max_age| entry.populated_at.elapsed() >= max_age)
    }
}

impl Default for GenreIndex {
    fn default() -> Self {
        Self::new()
    }
}
