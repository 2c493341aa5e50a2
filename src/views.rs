//! Field schemas for the transaction and investment tables, and conversion of
//! the backend models into engine records.

use std::collections::HashMap;

use crate::engine::value::parse_date;
use crate::engine::{FieldDef, Record, Schema, TableView, Value};
use crate::error::{FinviewError, Result};
use crate::loader::Snapshot;
use crate::models::{Category, Investment, Transaction};

pub fn transaction_schema() -> Result<Schema> {
    Schema::new(
        "transactions",
        "id",
        vec![
            FieldDef::text("id", "ID"),
            FieldDef::date("transaction_date", "Date"),
            FieldDef::text("type", "Type"),
            FieldDef::money("amount", "Amount"),
            FieldDef::text("description", "Description"),
            FieldDef::text("category_id", "Category ID"),
            FieldDef::text("category", "Category"),
        ],
    )
}

pub fn investment_schema() -> Result<Schema> {
    Schema::new(
        "investments",
        "id",
        vec![
            FieldDef::text("id", "ID"),
            FieldDef::date("date_of_operation", "Date"),
            FieldDef::text("type_of_operation", "Operation"),
            FieldDef::text("asset_type", "Asset"),
            FieldDef::text("ticker", "Ticker"),
            FieldDef::text("full_name", "Name"),
            FieldDef::number("quantity", "Quantity"),
            FieldDef::money("total_value", "Total Value"),
            FieldDef::text("exchange", "Exchange"),
        ],
    )
}

/// Columns shown by default when the terminal is narrow.
pub fn compact_columns(schema: &Schema) -> Vec<&str> {
    match schema.name() {
        "transactions" => vec!["transaction_date", "type", "amount", "description", "category"],
        "investments" => vec!["date_of_operation", "type_of_operation", "ticker", "quantity", "total_value"],
        _ => schema.field_names(),
    }
}

fn text(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else {
        Value::Text(s.to_string())
    }
}

fn date(field: &str, raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    parse_date(raw)
        .map(Value::Date)
        .ok_or_else(|| FinviewError::InvalidRecord {
            field: field.to_string(),
            reason: format!("unparsable date {raw:?}"),
        })
}

/// Build transaction records, resolving `category_id` against the category
/// list into a `category` column.
pub fn transaction_records(
    schema: &Schema,
    transactions: &[Transaction],
    categories: &[Category],
) -> Result<Vec<Record>> {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    transactions
        .iter()
        .map(|t| {
            let category = t
                .category_id
                .as_deref()
                .and_then(|id| names.get(id).copied())
                .map(text)
                .unwrap_or(Value::Null);
            Record::new(
                schema,
                vec![
                    Value::Text(t.id.clone()),
                    date("transaction_date", &t.transaction_date)?,
                    text(&t.kind),
                    Value::Number(t.amount),
                    text(&t.description),
                    t.category_id.as_deref().map(text).unwrap_or(Value::Null),
                    category,
                ],
            )
        })
        .collect()
}

pub fn investment_records(schema: &Schema, investments: &[Investment]) -> Result<Vec<Record>> {
    investments
        .iter()
        .map(|i| {
            Record::new(
                schema,
                vec![
                    Value::Text(i.id.clone()),
                    date("date_of_operation", &i.date_of_operation)?,
                    text(&i.type_of_operation),
                    text(&i.asset_type),
                    text(&i.ticker),
                    text(&i.full_name),
                    Value::Number(i.quantity),
                    Value::Number(i.total_value),
                    text(&i.exchange),
                ],
            )
        })
        .collect()
}

pub fn transactions_view(snapshot: &Snapshot) -> Result<TableView> {
    let schema = transaction_schema()?;
    let records = transaction_records(&schema, &snapshot.transactions, &snapshot.categories)?;
    TableView::new(schema, records)
}

pub fn investments_view(snapshot: &Snapshot) -> Result<TableView> {
    let schema = investment_schema()?;
    let records = investment_records(&schema, &snapshot.investments)?;
    TableView::new(schema, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Predicate, SortDirection};
    use crate::loader::parse_snapshot;

    const SNAPSHOT: &str = r#"{
        "categories": [{"id": 1, "name": "Groceries"}, {"id": 2, "name": "Salary"}],
        "transactions": [
            {"id": 1, "type": "expense", "amount": 54.2, "description": "Weekly Grocery Run",
             "category_id": 1, "transaction_date": "2025-01-04"},
            {"id": 2, "type": "income", "amount": "2100.00", "description": "January pay",
             "category_id": 2, "transaction_date": "2025-01-27"},
            {"id": 3, "type": "expense", "amount": 12, "description": "Parking",
             "category_id": 99, "transaction_date": "2025-02-02T18:30:00"}
        ],
        "investments": [
            {"id": "x", "type_of_operation": "buy", "asset_type": "ETF", "ticker": "VWCE",
             "full_name": "Vanguard FTSE All-World", "quantity": 2, "total_value": 230,
             "date_of_operation": "2025-01-10", "exchange": "XETRA"},
            {"id": "y", "type_of_operation": "buy", "asset_type": "Stock", "ticker": "AAPL",
             "full_name": "Apple Inc.", "quantity": 1, "total_value": 190.5,
             "date_of_operation": "2025-01-12", "exchange": "NASDAQ"},
            {"id": "z", "type_of_operation": "sell", "asset_type": "ETF", "ticker": "VWCE",
             "full_name": "Vanguard FTSE All-World", "quantity": 1, "total_value": 120,
             "date_of_operation": "2025-02-01", "exchange": "XETRA"}
        ]
    }"#;

    #[test]
    fn test_schemas_are_valid() {
        assert_eq!(transaction_schema().unwrap().len(), 7);
        assert_eq!(investment_schema().unwrap().len(), 9);
    }

    #[test]
    fn test_category_names_resolved() {
        let snap = parse_snapshot(SNAPSHOT).unwrap();
        let view = transactions_view(&snap).unwrap();
        let schema = view.schema();
        let cats: Vec<String> = view
            .records()
            .iter()
            .map(|r| r.get(schema, "category").unwrap().to_string())
            .collect();
        assert_eq!(cats, vec!["Groceries", "Salary", ""]);
    }

    #[test]
    fn test_filter_and_sort_by_category() {
        let snap = parse_snapshot(SNAPSHOT).unwrap();
        let mut view = transactions_view(&snap).unwrap();
        view.set_filter("category", Predicate::OneOf(vec!["Groceries".into(), "Salary".into()]));
        view.set_sort("category");
        view.set_sort("category");
        assert_eq!(view.sort().direction, SortDirection::Desc);
        let ids: Vec<&str> = view.derive().records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_global_search_hits_description() {
        let snap = parse_snapshot(SNAPSHOT).unwrap();
        let mut view = transactions_view(&snap).unwrap();
        view.set_global_filter("grocery");
        assert_eq!(view.filtered_count(), 1);
        assert_eq!(view.derive().records[0].id(), "1");
    }

    #[test]
    fn test_investment_filters() {
        let snap = parse_snapshot(SNAPSHOT).unwrap();
        let mut view = investments_view(&snap).unwrap();
        assert_eq!(view.distinct_values("ticker"), vec!["VWCE", "AAPL"]);
        assert_eq!(view.distinct_values("exchange"), vec!["XETRA", "NASDAQ"]);

        view.set_filter("ticker", Predicate::exact("VWCE"));
        view.set_filter("total_value", Predicate::number_range("200", ""));
        let ids: Vec<&str> = view.derive().records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[test]
    fn test_bad_date_rejected_at_construction() {
        let snap = parse_snapshot(
            r#"{"transactions": [{"id": 1, "type": "expense", "amount": 1,
                "transaction_date": "yesterday"}]}"#,
        )
        .unwrap();
        let err = transactions_view(&snap).unwrap_err();
        assert!(err.to_string().contains("transaction_date"));
    }

    #[test]
    fn test_compact_columns_exist_in_schema() {
        for schema in [transaction_schema().unwrap(), investment_schema().unwrap()] {
            for col in compact_columns(&schema) {
                assert!(schema.index_of(col).is_some(), "{col}");
            }
        }
    }
}
