//! Intent dispatch: every path ends in a plain-text fulfillment message

use crate::format::{filter_by_price, format_results};
use crate::model::{WebhookRequest, WebhookResponse};
use crate::query::BookQuery;
use folio_scanner::{CatalogItem, ScanError, Storefront};
use tracing::{debug, error, info, warn};

pub const SEARCH_BOOKS_INTENT: &str = "SearchBooks";

pub const UNKNOWN_INTENT_MESSAGE: &str = "Sorry, I didn't understand your request.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Sorry, I couldn't reach the bookstore right now. Please try again later.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry, something went wrong while searching for books.";

/// Intents this webhook knows how to fulfill
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SearchBooks,
    Unknown(String),
}

impl Intent {
    pub fn parse(display_name: &str) -> Self {
        match display_name.trim() {
            SEARCH_BOOKS_INTENT => Intent::SearchBooks,
            other => Intent::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intent::SearchBooks => SEARCH_BOOKS_INTENT,
            Intent::Unknown(name) => name,
        }
    }
}

pub fn genre_not_found_message(genre: &str) -> String {
    format!("Sorry, I couldn't find the genre '{}'.", genre)
}

/// Route a webhook request to its intent handler.
pub async fn handle_intent(storefront: &Storefront, request: &WebhookRequest) -> WebhookResponse {
    let intent = Intent::parse(request.intent_name());
    debug!("Handling intent {}", intent.name());

    let message = match intent {
        Intent::SearchBooks => {
            let query = BookQuery::from_parameters(request.parameters());
            fulfill_search(storefront, &query).await
        }
        Intent::Unknown(name) => {
            info!("Unsupported intent '{}'", name);
            UNKNOWN_INTENT_MESSAGE.to_string()
        }
    };

    WebhookResponse::new(message)
}

/// Resolve the genre, scrape its catalog page and keep what fits the budget.
pub async fn execute_search(
    storefront: &Storefront,
    query: &BookQuery,
) -> Result<Vec<CatalogItem>, ScanError> {
    let items = storefront.search(query.genre.as_deref()).await?;
    let total = items.len();
    let items = filter_by_price(items, query.price_limit);
    debug!("{} of {} items within price limit", items.len(), total);
    Ok(items)
}

/// Run a search and render the already filtered result, translating failures
/// into messages.
pub async fn fulfill_search(storefront: &Storefront, query: &BookQuery) -> String {
    match execute_search(storefront, query).await {
        Ok(items) => format_results(&items, None),
        Err(e) => describe_error(&e),
    }
}

/// User-facing text for a failed search. Raw errors only go to the log.
pub fn describe_error(err: &ScanError) -> String {
    match err {
        ScanError::GenreNotFound(genre) => {
            info!("Requested genre not found: {}", genre);
            genre_not_found_message(genre)
        }
        e if e.is_transport() => {
            warn!("Storefront unavailable: {}", e);
            UNAVAILABLE_MESSAGE.to_string()
        }
        e => {
            error!("Book search failed: {}", e);
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}
