use std::collections::HashSet;

use crate::error::{FinviewError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Rendered as a currency amount.
    pub money: bool,
}

impl FieldDef {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            money: false,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn money(name: &str, label: &str) -> Self {
        Self {
            money: true,
            ..Self::new(name, label, FieldKind::Number)
        }
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }
}

/// Ordered field list for one record type. Every record built against a
/// schema stores exactly one value per field, in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    id_field: String,
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(name: &str, id_field: &str, fields: Vec<FieldDef>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.is_empty() {
                return Err(FinviewError::Schema(format!("{name}: empty field name")));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FinviewError::Schema(format!(
                    "{name}: duplicate field '{}'",
                    field.name
                )));
            }
        }
        if !seen.contains(id_field) {
            return Err(FinviewError::Schema(format!(
                "{name}: id field '{id_field}' is not declared"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            id_field: id_field.to_string(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
