use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::engine::value::parse_number;

/// A row of the backend's `transactions` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "de_number")]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub transaction_date: String,
}

/// A row of the backend's `investments` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Investment {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// `buy` or `sell`.
    pub type_of_operation: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(deserialize_with = "de_number")]
    pub quantity: f64,
    #[serde(deserialize_with = "de_number")]
    pub total_value: f64,
    #[serde(default)]
    pub date_of_operation: String,
    #[serde(default)]
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

// Ids arrive as integers or UUID strings; amounts as JSON numbers or as
// decimal strings.

fn id_text<E: de::Error>(raw: Json) -> Result<Option<String>, E> {
    match raw {
        Json::Null => Ok(None),
        Json::String(s) => Ok(Some(s)),
        Json::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!("expected id, got {other}"))),
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    id_text::<D::Error>(Json::deserialize(deserializer)?)?.ok_or_else(|| de::Error::custom("id is null"))
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    id_text(Json::deserialize(deserializer)?)
}

fn de_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Json::deserialize(deserializer)? {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("number out of range: {n}"))),
        Json::String(s) => parse_number(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid number: {s:?}"))),
        other => Err(de::Error::custom(format!("expected number, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_accepts_numeric_and_string_fields() {
        let t: Transaction = serde_json::from_str(
            r#"{"id": 12, "type": "expense", "amount": "42.50", "description": "Rent",
                "category_id": 3, "transaction_date": "2025-01-01", "user_id": "abc"}"#,
        )
        .unwrap();
        assert_eq!(t.id, "12");
        assert_eq!(t.kind, "expense");
        assert_eq!(t.amount, 42.5);
        assert_eq!(t.category_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_transaction_null_category() {
        let t: Transaction = serde_json::from_str(
            r#"{"id": "a1", "type": "income", "amount": 1000, "category_id": null}"#,
        )
        .unwrap();
        assert_eq!(t.category_id, None);
        assert!(t.description.is_empty());
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let err = serde_json::from_str::<Transaction>(
            r#"{"id": 1, "type": "expense", "amount": "lots"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid number"));
    }

    #[test]
    fn test_non_finite_amount_is_an_error() {
        for raw in ["NaN", "inf", "-Infinity"] {
            let json = format!(r#"{{"id": 1, "type": "expense", "amount": "{raw}"}}"#);
            let err = serde_json::from_str::<Transaction>(&json).unwrap_err();
            assert!(err.to_string().contains("invalid number"), "{raw}");
        }
    }

    #[test]
    fn test_investment() {
        let i: Investment = serde_json::from_str(
            r#"{"id": 7, "type_of_operation": "buy", "asset_type": "ETF", "ticker": "VWCE",
                "full_name": "Vanguard FTSE All-World", "quantity": 3, "total_value": 345.6,
                "date_of_operation": "2025-02-10T09:00:00", "exchange": "XETRA"}"#,
        )
        .unwrap();
        assert_eq!(i.ticker, "VWCE");
        assert_eq!(i.quantity, 3.0);
        assert_eq!(i.total_value, 345.6);
    }
}
