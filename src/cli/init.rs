use std::path::PathBuf;

use crate::error::{FinviewError, Result};
use crate::loader::SNAPSHOT_FILE;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, rows: Option<usize>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(rows) = rows {
        if rows == 0 {
            return Err(FinviewError::Settings("rows per page must be at least 1".into()));
        }
        settings.rows_per_page = rows;
    }

    let data_dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    save_settings(&settings)?;

    println!("Data directory: {}", data_dir.display());
    println!("Rows per page: {}", settings.rows_per_page);
    let snapshot = data_dir.join(SNAPSHOT_FILE);
    if !snapshot.exists() {
        println!(
            "Save your transactions and investments as {} to get started.",
            snapshot.display()
        );
    }
    Ok(())
}
