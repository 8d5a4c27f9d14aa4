pub mod format;
pub mod intent;
pub mod model;
pub mod query;

pub use format::{NO_RESULTS_MESSAGE, filter_by_price, format_results};
pub use intent::{Intent, execute_search, fulfill_search, handle_intent};
pub use model::{WebhookRequest, WebhookResponse};
pub use query::BookQuery;
