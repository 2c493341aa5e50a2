use std::collections::HashSet;

use super::schema::{FieldKind, Schema};
use super::value::Value;
use crate::error::{FinviewError, Result};

/// One transaction or investment, as a flat row of values aligned with a
/// [`Schema`]. Records are never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    values: Vec<Value>,
}

impl Record {
    /// Build a record, checking the value count and each value's kind against
    /// the schema. The id field must be present.
    pub fn new(schema: &Schema, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(FinviewError::Schema(format!(
                "{}: expected {} values, got {}",
                schema.name(),
                schema.len(),
                values.len()
            )));
        }
        for (field, value) in schema.fields().iter().zip(&values) {
            let fits = matches!(
                (field.kind, value),
                (_, Value::Null)
                    | (FieldKind::Text, Value::Text(_))
                    | (FieldKind::Number, Value::Number(_))
                    | (FieldKind::Date, Value::Date(_))
            );
            if !fits {
                return Err(FinviewError::InvalidRecord {
                    field: field.name.clone(),
                    reason: format!("expected {:?}, got {value:?}", field.kind),
                });
            }
        }

        let id_idx = schema
            .index_of(schema.id_field())
            .ok_or_else(|| FinviewError::UnknownField(schema.id_field().to_string()))?;
        let id = values[id_idx].to_string();
        if id.is_empty() {
            return Err(FinviewError::InvalidRecord {
                field: schema.id_field().to_string(),
                reason: "missing id".to_string(),
            });
        }
        Ok(Self { id, values })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get(&self, schema: &Schema, field: &str) -> Option<&Value> {
        schema.index_of(field).and_then(|i| self.values.get(i))
    }

    /// All values joined with spaces, lowercased. Nulls contribute an empty
    /// string.
    pub fn search_text(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

pub fn ensure_unique_ids(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(FinviewError::DuplicateId(record.id().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::FieldDef;
    use crate::engine::value::parse_date;

    fn schema() -> Schema {
        Schema::new(
            "t",
            "id",
            vec![
                FieldDef::text("id", "ID"),
                FieldDef::text("description", "Description"),
                FieldDef::money("amount", "Amount"),
                FieldDef::date("date", "Date"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_record() {
        let s = schema();
        let r = Record::new(
            &s,
            vec![
                Value::Text("7".into()),
                Value::Text("Weekly Grocery Run".into()),
                Value::Number(42.5),
                Value::Date(parse_date("2025-02-03").unwrap()),
            ],
        )
        .unwrap();
        assert_eq!(r.id(), "7");
        assert_eq!(r.get(&s, "amount"), Some(&Value::Number(42.5)));
        assert_eq!(r.get(&s, "nope"), None);
        assert_eq!(r.search_text(), "7 weekly grocery run 42.5 2025-02-03");
    }

    #[test]
    fn test_new_record_rejects_kind_mismatch() {
        let s = schema();
        let err = Record::new(
            &s,
            vec![
                Value::Text("1".into()),
                Value::Text("x".into()),
                Value::Text("not a number".into()),
                Value::Null,
            ],
        )
        .unwrap_err();
        assert!(matches!(err, FinviewError::InvalidRecord { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_new_record_requires_id() {
        let s = schema();
        let err = Record::new(&s, vec![Value::Null, Value::Null, Value::Null, Value::Null])
            .unwrap_err();
        assert!(err.to_string().contains("missing id"));
    }

    #[test]
    fn test_new_record_rejects_wrong_arity() {
        let s = schema();
        assert!(Record::new(&s, vec![Value::Text("1".into())]).is_err());
    }

    #[test]
    fn test_ensure_unique_ids() {
        let s = schema();
        let make = |id: &str| {
            Record::new(
                &s,
                vec![Value::Text(id.into()), Value::Null, Value::Null, Value::Null],
            )
            .unwrap()
        };
        assert!(ensure_unique_ids(&[make("1"), make("2")]).is_ok());
        let err = ensure_unique_ids(&[make("1"), make("2"), make("1")]).unwrap_err();
        assert!(matches!(err, FinviewError::DuplicateId(ref id) if id == "1"));
    }
}
