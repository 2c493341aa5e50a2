use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FinviewError, Result};
use crate::models::{Category, Investment, Transaction};
use crate::settings::get_data_dir;

pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// The backend's list responses merged into one document. Every section is
/// optional so a single `/transactions` or `/investments` response can be
/// loaded as-is.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub investments: Vec<Investment>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

pub fn default_snapshot_path() -> PathBuf {
    get_data_dir().join(SNAPSHOT_FILE)
}

pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(FinviewError::Other(format!(
            "No snapshot at {}. Pass --file or run `finview init` to choose a data directory.",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let snapshot = parse_snapshot(&content)?;
    tracing::info!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        investments = snapshot.investments.len(),
        categories = snapshot.categories.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Load from `file` if given, otherwise from the data directory.
pub fn load_from(file: Option<&str>) -> Result<Snapshot> {
    match file {
        Some(f) => load_snapshot(Path::new(f)),
        None => load_snapshot(&default_snapshot_path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_snapshot() {
        let snap = parse_snapshot(
            r#"{"transactions": [{"id": 1, "type": "expense", "amount": 5}]}"#,
        )
        .unwrap();
        assert_eq!(snap.transactions.len(), 1);
        assert!(snap.investments.is_empty());
        assert!(snap.categories.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_snapshot("{not json").unwrap_err();
        assert!(matches!(err, FinviewError::Json(_)));
    }

    #[test]
    fn test_load_snapshot_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(
            &path,
            r#"{"categories": [{"id": 1, "name": "Food"}], "investments": []}"#,
        )
        .unwrap();
        let snap = load_snapshot(&path).unwrap();
        assert_eq!(snap.categories[0].name, "Food");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("No snapshot"));
    }
}
