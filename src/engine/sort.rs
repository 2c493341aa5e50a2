use serde::{Deserialize, Serialize};

use super::record::Record;
use super::schema::Schema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "\u{25b2}",
            SortDirection::Desc => "\u{25bc}",
        }
    }
}

/// Sort column and direction. An empty key keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: &str, direction: SortDirection) -> Self {
        Self {
            key: key.to_string(),
            direction,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Stable sort by the key's natural ordering. Records with equal keys keep
/// their relative input order in both directions. An empty or unknown key
/// returns the input unchanged.
pub fn apply_sort<'a>(
    schema: &Schema,
    mut records: Vec<&'a Record>,
    sort: &SortState,
) -> Vec<&'a Record> {
    if !sort.is_active() {
        return records;
    }
    let Some(idx) = schema.index_of(&sort.key) else {
        tracing::debug!(key = %sort.key, schema = schema.name(), "ignoring sort on unknown field");
        return records;
    };

    records.sort_by(|a, b| {
        let ord = match (a.value(idx), b.value(idx)) {
            (Some(x), Some(y)) => x.compare(y),
            _ => std::cmp::Ordering::Equal,
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    records
}
