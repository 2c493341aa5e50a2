use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{PagePolicy, DEFAULT_ROWS_PER_PAGE};
use crate::error::{FinviewError, Result};

/// Overrides `~/.config/finview` (used by the integration tests).
pub const CONFIG_DIR_ENV: &str = "FINVIEW_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    #[serde(default)]
    pub page_policy: PagePolicy,
}

fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            rows_per_page: default_rows_per_page(),
            page_policy: PagePolicy::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("finview")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("finview")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Read settings from `path`. A missing file gives the defaults, missing
/// fields take their defaults, and a malformed file is ignored with a warning.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str::<Settings>(&content) {
        Ok(mut settings) => {
            settings.rows_per_page = settings.rows_per_page.max(1);
            settings
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| FinviewError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            rows_per_page: 20,
            page_policy: PagePolicy::clamp_only(),
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.rows_per_page, 20);
        assert_eq!(loaded.page_policy, PagePolicy::clamp_only());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(loaded.rows_per_page, 10);
        assert_eq!(loaded.page_policy, PagePolicy::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{\"rows_per_page\": \"many\"").unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.rows_per_page, 10);
        assert_eq!(loaded.data_dir, Settings::default().data_dir);
    }

    #[test]
    fn test_partial_policy_and_zero_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/tmp/test", "rows_per_page": 0, "page_policy": {"reset_on_filter": false}}"#,
        )
        .unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.rows_per_page, 1);
        assert!(!loaded.page_policy.reset_on_filter);
        assert!(loaded.page_policy.reset_on_sort);
        assert!(!loaded.page_policy.reset_on_rows_per_page);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.rows_per_page, 10);
        assert_eq!(s.page_policy, PagePolicy::default());
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.rows_per_page, 10);
        assert!(s.page_policy.reset_on_filter);
        assert!(!s.page_policy.reset_on_rows_per_page);
    }

    #[test]
    fn test_shellexpand_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = shellexpand_path("~/finview");
            assert!(expanded.starts_with(&*home.to_string_lossy()));
            assert!(expanded.ends_with("finview"));
        }
    }
}
