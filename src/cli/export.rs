use std::io::Write;
use std::path::Path;

use crate::cli::{open_view, ViewArgs, ViewKind};
use crate::engine::TableView;
use crate::error::Result;

pub fn run(kind: ViewKind, output: &str, args: &ViewArgs) -> Result<()> {
    let view = open_view(kind, args)?;
    let path = Path::new(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let count = write_csv(&view, file)?;
    tracing::info!(path = %path.display(), count, "exported records");
    println!("Wrote {count} records to {}", path.display());
    Ok(())
}

/// Write every filtered record in sort order, one column per field. Values
/// are written raw (no currency formatting) so the file re-imports cleanly.
pub fn write_csv<W: Write>(view: &TableView, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(view.schema().field_names())?;
    let records = view.sorted();
    for record in &records {
        wtr.write_record(record.values().iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Predicate;
    use crate::loader::parse_snapshot;
    use crate::views::investments_view;

    fn view() -> TableView {
        let snap = parse_snapshot(
            r#"{"investments": [
                {"id": "a", "type_of_operation": "buy", "asset_type": "ETF", "ticker": "VWCE",
                 "full_name": "Vanguard FTSE All-World", "quantity": 2, "total_value": 230,
                 "date_of_operation": "2025-01-10", "exchange": "XETRA"},
                {"id": "b", "type_of_operation": "buy", "asset_type": "Stock", "ticker": "AAPL",
                 "full_name": "Apple, Inc.", "quantity": 1, "total_value": 190.5,
                 "date_of_operation": "2025-01-12", "exchange": ""},
                {"id": "c", "type_of_operation": "sell", "asset_type": "ETF", "ticker": "VWCE",
                 "full_name": "Vanguard FTSE All-World", "quantity": 1, "total_value": 120,
                 "date_of_operation": "2025-02-01", "exchange": "XETRA"}
            ]}"#,
        )
        .unwrap();
        investments_view(&snap).unwrap().with_rows_per_page(1)
    }

    #[test]
    fn test_write_csv_all_pages_in_sort_order() {
        let mut v = view();
        v.set_sort("total_value");
        let mut buf = Vec::new();
        let count = write_csv(&v, &mut buf).unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,date_of_operation,type_of_operation,asset_type,ticker,full_name,quantity,total_value,exchange"
        );
        assert!(lines[1].starts_with("c,2025-02-01,sell"));
        assert_eq!(lines[2], "b,2025-01-12,buy,Stock,AAPL,\"Apple, Inc.\",1,190.5,");
        assert!(lines[3].starts_with("a,"));
    }

    #[test]
    fn test_write_csv_respects_filters() {
        let mut v = view();
        v.set_filter("ticker", Predicate::exact("VWCE"));
        let mut buf = Vec::new();
        assert_eq!(write_csv(&v, &mut buf).unwrap(), 2);
    }
}
