use std::collections::BTreeMap;

use super::record::Record;
use super::schema::Schema;
use super::value::{parse_date, parse_date_end, parse_number, Value};

/// Matching rule for a single field. Range bounds are kept as the raw text
/// the user typed; a bound that does not parse is treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match against any of the listed values.
    OneOf(Vec<String>),
    NumberRange {
        min: Option<String>,
        max: Option<String>,
    },
    DateRange {
        start: Option<String>,
        end: Option<String>,
    },
    /// Case-insensitive substring match.
    Contains(String),
}

impl Predicate {
    pub fn exact(value: &str) -> Self {
        Predicate::OneOf(vec![value.to_string()])
    }

    pub fn number_range(min: &str, max: &str) -> Self {
        Predicate::NumberRange {
            min: non_empty(min),
            max: non_empty(max),
        }
    }

    pub fn date_range(start: &str, end: &str) -> Self {
        Predicate::DateRange {
            start: non_empty(start),
            end: non_empty(end),
        }
    }

    pub fn contains(needle: &str) -> Self {
        Predicate::Contains(needle.to_string())
    }

    /// False when the predicate would not restrict anything (empty set,
    /// no usable bound, empty needle).
    pub fn is_active(&self) -> bool {
        match self {
            Predicate::OneOf(choices) => !choices.is_empty(),
            Predicate::NumberRange { min, max } => {
                bound(min, parse_number).is_some() || bound(max, parse_number).is_some()
            }
            Predicate::DateRange { start, end } => {
                bound(start, parse_date).is_some() || bound(end, parse_date_end).is_some()
            }
            Predicate::Contains(needle) => !needle.is_empty(),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::OneOf(choices) => {
                choices.is_empty() || choices.iter().any(|c| equals_choice(value, c))
            }
            Predicate::NumberRange { min, max } => {
                let (min, max) = (bound(min, parse_number), bound(max, parse_number));
                if min.is_none() && max.is_none() {
                    return true;
                }
                let Some(n) = value.as_number() else {
                    return false;
                };
                min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m)
            }
            Predicate::DateRange { start, end } => {
                let (start, end) = (bound(start, parse_date), bound(end, parse_date_end));
                if start.is_none() && end.is_none() {
                    return true;
                }
                let Some(d) = value.as_date() else {
                    return false;
                };
                start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
            }
            Predicate::Contains(needle) => {
                needle.is_empty()
                    || value
                        .to_string()
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
            }
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn bound<T>(raw: &Option<String>, parse: fn(&str) -> Option<T>) -> Option<T> {
    raw.as_deref().and_then(parse)
}

fn equals_choice(value: &Value, choice: &str) -> bool {
    match value {
        Value::Number(n) => match parse_number(choice) {
            Some(c) => *n == c,
            None => value.to_string() == choice,
        },
        Value::Date(d) => match parse_date(choice) {
            Some(c) => *d == c,
            None => value.to_string() == choice,
        },
        _ => value.to_string() == choice,
    }
}

/// Per-field predicates plus an optional global search string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    fields: BTreeMap<String, Predicate>,
    global: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, predicate: Predicate) {
        self.fields.insert(field.to_string(), predicate);
    }

    pub fn remove(&mut self, field: &str) -> bool {
        self.fields.remove(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.fields.get(field)
    }

    pub fn set_global(&mut self, text: &str) {
        self.global = text.to_string();
    }

    pub fn global(&self) -> &str {
        &self.global
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.global.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when nothing would be filtered out.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.fields.values().all(|p| !p.is_active())
    }

    /// Short human-readable summary, e.g. `search: "rent", amount: 50..100`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.global.is_empty() {
            parts.push(format!("search: \"{}\"", self.global));
        }
        for (field, predicate) in self.iter().filter(|(_, p)| p.is_active()) {
            let text = match predicate {
                Predicate::OneOf(choices) => choices.join("|"),
                Predicate::NumberRange { min, max } => format!(
                    "{}..{}",
                    min.as_deref().unwrap_or(""),
                    max.as_deref().unwrap_or("")
                ),
                Predicate::DateRange { start, end } => format!(
                    "{}..{}",
                    start.as_deref().unwrap_or(""),
                    end.as_deref().unwrap_or("")
                ),
                Predicate::Contains(needle) => format!("~{needle}"),
            };
            parts.push(format!("{field}: {text}"));
        }
        parts.join(", ")
    }
}

/// Keep the records that satisfy every active predicate and the global
/// search. Input order is preserved. Predicates on fields the schema does not
/// declare are skipped.
pub fn apply_filters<'a>(
    schema: &Schema,
    records: &'a [Record],
    filters: &FilterState,
) -> Vec<&'a Record> {
    let mut active = Vec::new();
    for (field, predicate) in filters.iter().filter(|(_, p)| p.is_active()) {
        match schema.index_of(field) {
            Some(idx) => active.push((idx, predicate)),
            None => tracing::debug!(field, schema = schema.name(), "ignoring filter on unknown field"),
        }
    }
    let needle = filters.global().to_lowercase();

    if active.is_empty() && needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| needle.is_empty() || record.search_text().contains(&needle))
        .filter(|record| {
            active.iter().all(|(idx, predicate)| {
                record
                    .value(*idx)
                    .is_some_and(|value| predicate.matches(value))
            })
        })
        .collect()
}
