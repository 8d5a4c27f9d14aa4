//! Webhook request/response bodies as sent by the conversational front-end
//!
//! ```json
//! {
//!   "queryResult": {
//!     "intent": { "displayName": "SearchBooks" },
//!     "parameters": { "genre": "travel", "price_limit": "20" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: QueryResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub intent: IntentInfo,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl WebhookRequest {
    pub fn new(intent: &str, parameters: HashMap<String, Value>) -> Self {
        Self {
            query_result: QueryResult {
                intent: IntentInfo {
                    display_name: intent.to_string(),
                },
                parameters,
            },
        }
    }

    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.query_result.parameters
    }
}

impl WebhookResponse {
    pub fn new(fulfillment_text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: fulfillment_text.into(),
        }
    }
}
