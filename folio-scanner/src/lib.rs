pub mod catalog;
pub mod error;
pub mod fetcher;
pub mod genre;
pub mod item;
pub mod selectors;
pub mod storefront;
pub mod urls;

pub use error::ScanError;
pub use fetcher::PageFetcher;
pub use genre::{GenreIndex, GenreSlugMap, normalize_genre};
pub use item::CatalogItem;
pub use storefront::Storefront;
pub use urls::DEFAULT_BASE_URL;
