//! Typed book-search parameters built from the webhook's parameter bag

use serde_json::Value;
use std::collections::HashMap;

pub const GENRE_PARAM: &str = "genre";
pub const PRICE_LIMIT_PARAM: &str = "price_limit";

/// A validated book search. Unusable parameters become "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub genre: Option<String>,
    pub price_limit: Option<f64>,
}

impl BookQuery {
    pub fn new(genre: Option<&str>, price_limit: Option<f64>) -> Self {
        Self {
            genre: genre.and_then(parse_text),
            price_limit: price_limit.filter(|limit| is_valid_limit(*limit)),
        }
    }

    pub fn from_parameters(parameters: &HashMap<String, Value>) -> Self {
        Self {
            genre: parameters.get(GENRE_PARAM).and_then(genre_value),
            price_limit: parameters.get(PRICE_LIMIT_PARAM).and_then(parse_price_limit),
        }
    }
}

/// Trimmed text, or `None` when nothing is left.
pub fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn genre_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => parse_text(s),
        // List entities arrive as arrays; the first one wins
        Value::Array(values) => values.iter().find_map(genre_value),
        _ => None,
    }
}

/// Accepts `"20"`, `20`, `20.5` and unit-currency objects like
/// `{"amount": 20, "currency": "USD"}`. Anything else is no limit.
pub fn parse_price_limit(value: &Value) -> Option<f64> {
    let limit = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        Value::Object(fields) => fields.get("amount").and_then(parse_price_limit),
        _ => None,
    }?;

    is_valid_limit(limit).then_some(limit)
}

fn is_valid_limit(limit: f64) -> bool {
    limit.is_finite() && limit >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_parameters_full() {
        let query = BookQuery::from_parameters(&params(json!({
            "genre": "  Historical Fiction ",
            "price_limit": "25.5"
        })));

        assert_eq!(query.genre.as_deref(), Some("Historical Fiction"));
        assert_eq!(query.price_limit, Some(25.5));
    }

    #[test]
    fn test_from_parameters_empty() {
        let query = BookQuery::from_parameters(&HashMap::new());
        assert_eq!(query, BookQuery::default());

        let query = BookQuery::from_parameters(&params(json!({
            "genre": "   ",
            "price_limit": ""
        })));
        assert_eq!(query, BookQuery::default());
    }

    #[test]
    fn test_invalid_price_limit_is_no_constraint() {
        for bad in [json!("cheap"), json!("-5"), json!("NaN"), json!(null), json!(true)] {
            assert_eq!(parse_price_limit(&bad), None, "{bad} should be ignored");
        }
    }

    #[test]
    fn test_numeric_price_limits() {
        assert_eq!(parse_price_limit(&json!(40)), Some(40.0));
        assert_eq!(parse_price_limit(&json!(12.75)), Some(12.75));
        assert_eq!(parse_price_limit(&json!("0")), Some(0.0));
        assert_eq!(
            parse_price_limit(&json!({"amount": 20, "currency": "USD"})),
            Some(20.0)
        );
    }

    #[test]
    fn test_genre_from_list_entity() {
        let query = BookQuery::from_parameters(&params(json!({
            "genre": ["", "Travel", "Poetry"]
        })));
        assert_eq!(query.genre.as_deref(), Some("Travel"));
    }

    #[test]
    fn test_new_validates() {
        let query = BookQuery::new(Some(" "), Some(-1.0));
        assert_eq!(query, BookQuery::default());

        let query = BookQuery::new(Some("poetry"), Some(10.0));
        assert_eq!(query.genre.as_deref(), Some("poetry"));
        assert_eq!(query.price_limit, Some(10.0));
    }
}
