use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::loader::load_from;
use crate::reports::{self, Composition, ExpenseBreakdown, NetWorth};

pub fn run(file: Option<&str>) -> Result<()> {
    let snapshot = load_from(file)?;
    let net = reports::get_net_worth(&snapshot.transactions, &snapshot.investments);
    let expenses = reports::get_expense_breakdown(&snapshot.transactions, &snapshot.categories);
    let composition = reports::get_composition(&snapshot.transactions, &snapshot.investments);
    println!("{}", format_net_worth(&net));
    if !composition.items.is_empty() {
        println!("\n{}", format_composition(&composition));
    }
    if !expenses.categories.is_empty() {
        println!("\n{}", format_expenses(&expenses));
    }
    Ok(())
}

pub fn format_net_worth(data: &NetWorth) -> String {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new(format!("Income ({} transactions)", data.transaction_count)),
        Cell::new(money(data.income)),
    ]);
    table.add_row(vec![Cell::new("Expenses"), Cell::new(money(data.expenses))]);
    table.add_row(vec![
        Cell::new(format!("Invested ({} operations)", data.investment_count)),
        Cell::new(money(data.invested)),
    ]);
    let label = if data.net_worth >= 0.0 {
        "NET WORTH".green().bold()
    } else {
        "NET WORTH".red().bold()
    };
    table.add_row(vec![Cell::new(label), Cell::new(money(data.net_worth))]);
    format!("Summary\n{table}")
}

pub fn format_composition(data: &Composition) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Holding", "Value", "%"]);
    for item in &data.items {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(money(item.value)),
            Cell::new(format!("{:.1}%", item.pct)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(data.total)),
        Cell::new(""),
    ]);
    format!("Finance Composition\n{table}")
}

pub fn format_expenses(data: &ExpenseBreakdown) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &data.categories {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(money(item.total)),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(data.total)),
        Cell::new(""),
        Cell::new(""),
    ]);
    format!("Expenses by Category\n{table}")
}
