use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{open_view, request_page, ViewArgs, ViewKind};
use crate::engine::{FieldKind, TableView};
use crate::error::Result;
use crate::fmt;

pub fn run(kind: ViewKind, args: &ViewArgs) -> Result<()> {
    let mut view = open_view(kind, args)?;
    if let Some(warning) = request_page(&mut view, args.page) {
        eprintln!("{} {warning}", "Warning:".yellow().bold());
    }
    println!("{}", format_page(kind.title(), &view));
    Ok(())
}

/// Render the current page of `view` as a table with a page footer.
pub fn format_page(title: &str, view: &TableView) -> String {
    let schema = view.schema();
    let derived = view.derive();
    let sort = view.sort();

    let mut table = Table::new();
    let header: Vec<Cell> = schema
        .fields()
        .iter()
        .map(|f| {
            let label = if sort.is_active() && sort.key == f.name {
                format!("{} {}", f.label, sort.direction.arrow())
            } else {
                f.label.clone()
            };
            Cell::new(label.bold())
        })
        .collect();
    table.set_header(header);

    for record in &derived.records {
        let cells: Vec<Cell> = schema
            .fields()
            .iter()
            .zip(record.values())
            .map(|(field, value)| {
                let cell = Cell::new(fmt::cell(field, value));
                if field.kind == FieldKind::Number {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    let mut footer = format!(
        "Page {} / {} | {} of {} records",
        derived.current_page,
        derived.total_pages.max(1),
        derived.total,
        view.records().len(),
    );
    let filters = view.filters().describe();
    if !filters.is_empty() {
        footer.push_str(&format!(" | {filters}"));
    }

    if derived.records.is_empty() {
        format!("{title}\nNo matching records.\n{footer}")
    } else {
        format!("{title}\n{table}\n{footer}")
    }
}
