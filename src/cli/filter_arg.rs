//! Parsing of `--where FIELD=EXPR` arguments into predicates.
//!
//! The expression is read according to the field's kind:
//!
//! - `~TEXT` is a case-insensitive substring match on any field.
//! - `MIN..MAX`, `MIN..` and `..MAX` are ranges on number and date fields.
//! - Anything else is a comma-separated set of exact values.

use crate::engine::{FieldKind, Predicate, Schema};
use crate::error::{FinviewError, Result};

pub fn parse_where(schema: &Schema, arg: &str) -> Result<(String, Predicate)> {
    let (field, expr) = arg.split_once('=').ok_or_else(|| {
        FinviewError::Other(format!("Expected FIELD=EXPR in --where, got {arg:?}"))
    })?;
    let field = field.trim();
    let def = schema.field(field).ok_or_else(|| {
        FinviewError::UnknownField(format!(
            "{field} (expected one of: {})",
            schema.field_names().join(", ")
        ))
    })?;

    if let Some(needle) = expr.strip_prefix('~') {
        return Ok((field.to_string(), Predicate::contains(needle)));
    }

    let predicate = match (def.kind, expr.split_once("..")) {
        (FieldKind::Number, Some((min, max))) => Predicate::number_range(min.trim(), max.trim()),
        (FieldKind::Date, Some((start, end))) => Predicate::date_range(start.trim(), end.trim()),
        _ => Predicate::OneOf(
            expr.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    };
    Ok((field.to_string(), predicate))
}

/// Combine two `--where` expressions given for the same field. Ranges of the
/// same kind merge when they set different bounds (`amount=50..` plus
/// `amount=..100`); anything else is ambiguous and rejected.
pub fn merge(field: &str, existing: &Predicate, next: Predicate) -> Result<Predicate> {
    // None when both sides set the same bound.
    fn join(a: &Option<String>, b: Option<String>) -> Option<Option<String>> {
        match (a, b) {
            (Some(_), Some(_)) => None,
            (a, b) => Some(b.or_else(|| a.clone())),
        }
    }

    let merged = match (existing, next) {
        (Predicate::NumberRange { min, max }, Predicate::NumberRange { min: lo, max: hi }) => {
            join(min, lo)
                .zip(join(max, hi))
                .map(|(min, max)| Predicate::NumberRange { min, max })
        }
        (Predicate::DateRange { start, end }, Predicate::DateRange { start: lo, end: hi }) => {
            join(start, lo)
                .zip(join(end, hi))
                .map(|(start, end)| Predicate::DateRange { start, end })
        }
        _ => None,
    };
    merged.ok_or_else(|| {
        FinviewError::Other(format!(
            "--where given twice for {field}; use one expression such as {field}=MIN..MAX"
        ))
    })
}
