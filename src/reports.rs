use crate::models::{Category, Investment, Transaction};

// ---------------------------------------------------------------------------
// Net worth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NetWorth {
    pub income: f64,
    pub expenses: f64,
    /// Buys minus sells, at operation value.
    pub invested: f64,
    pub net_worth: f64,
    pub transaction_count: usize,
    pub investment_count: usize,
}

pub fn get_net_worth(transactions: &[Transaction], investments: &[Investment]) -> NetWorth {
    let sum_kind = |kind: &str| -> f64 {
        transactions
            .iter()
            .filter(|t| t.kind.eq_ignore_ascii_case(kind))
            .map(|t| t.amount)
            .sum()
    };
    let income = sum_kind("income");
    let expenses = sum_kind("expense");

    let invested: f64 = investments
        .iter()
        .map(|i| {
            if i.type_of_operation.eq_ignore_ascii_case("sell") {
                -i.total_value
            } else {
                i.total_value
            }
        })
        .sum();

    NetWorth {
        income,
        expenses,
        invested,
        net_worth: income - expenses + invested,
        transaction_count: transactions.len(),
        investment_count: investments.len(),
    }
}

// ---------------------------------------------------------------------------
// Expense breakdown
// ---------------------------------------------------------------------------

pub struct ExpenseItem {
    pub name: String,
    pub total: f64,
    pub pct: f64,
    pub count: usize,
}

pub struct ExpenseBreakdown {
    pub categories: Vec<ExpenseItem>,
    pub total: f64,
}

/// Expenses grouped by category name, largest first. Transactions without a
/// known category are grouped as "Uncategorized".
pub fn get_expense_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> ExpenseBreakdown {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for t in transactions.iter().filter(|t| t.kind.eq_ignore_ascii_case("expense")) {
        let name = t
            .category_id
            .as_deref()
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Uncategorized".to_string());
        match groups.iter_mut().find(|(n, _, _)| *n == name) {
            Some((_, total, count)) => {
                *total += t.amount;
                *count += 1;
            }
            None => groups.push((name, t.amount, 1)),
        }
    }

    let total: f64 = groups.iter().map(|(_, t, _)| t).sum();
    let mut items: Vec<ExpenseItem> = groups
        .into_iter()
        .map(|(name, sum, count)| ExpenseItem {
            pct: if total > 0.0 { sum / total * 100.0 } else { 0.0 },
            name,
            total: sum,
            count,
        })
        .collect();
    items.sort_by(|a, b| b.total.total_cmp(&a.total));
    ExpenseBreakdown {
        categories: items,
        total,
    }
}

// ---------------------------------------------------------------------------
// Finance composition
// ---------------------------------------------------------------------------

pub struct CompositionItem {
    pub name: String,
    pub value: f64,
    pub pct: f64,
}

pub struct Composition {
    pub items: Vec<CompositionItem>,
    pub total: f64,
}

fn asset_label(asset_type: &str) -> String {
    match asset_type.trim().to_lowercase().as_str() {
        "" => "Other".to_string(),
        "stock" | "stocks" => "Stocks".to_string(),
        "etf" | "etfs" => "ETF".to_string(),
        "crypto" => "Crypto".to_string(),
        _ => asset_type.trim().to_string(),
    }
}

/// Where the money sits: available cash (income minus expenses) first, then
/// the net invested value per asset type (buys minus sells) in first-seen
/// order. Groups that net to zero are left out.
pub fn get_composition(transactions: &[Transaction], investments: &[Investment]) -> Composition {
    let net = get_net_worth(transactions, &[]);
    let mut groups: Vec<(String, f64)> = vec![("Liquidity".to_string(), net.income - net.expenses)];

    for i in investments {
        let value = if i.type_of_operation.eq_ignore_ascii_case("sell") {
            -i.total_value
        } else {
            i.total_value
        };
        let name = asset_label(&i.asset_type);
        match groups.iter_mut().skip(1).find(|(n, _)| *n == name) {
            Some((_, total)) => *total += value,
            None => groups.push((name, value)),
        }
    }

    groups.retain(|(_, v)| v.abs() >= 0.005);
    let total: f64 = groups.iter().map(|(_, v)| v).sum();
    let items = groups
        .into_iter()
        .map(|(name, value)| CompositionItem {
            pct: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            name,
            value,
        })
        .collect();
    Composition { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(kind: &str, amount: f64) -> Transaction {
        Transaction {
            id: format!("{kind}{amount}"),
            kind: kind.to_string(),
            amount,
            description: String::new(),
            category_id: None,
            transaction_date: "2025-01-01".to_string(),
        }
    }

    fn inv(op: &str, asset: &str, value: f64) -> Investment {
        Investment {
            id: format!("{op}{asset}{value}"),
            type_of_operation: op.to_string(),
            asset_type: asset.to_string(),
            ticker: String::new(),
            full_name: String::new(),
            quantity: 1.0,
            total_value: value,
            date_of_operation: "2025-01-01".to_string(),
            exchange: String::new(),
        }
    }

    #[test]
    fn test_net_worth() {
        let txns = vec![txn("income", 2000.0), txn("expense", 450.0), txn("Expense", 50.0)];
        let invs = vec![inv("buy", "ETF", 1000.0), inv("sell", "ETF", 250.0)];
        let nw = get_net_worth(&txns, &invs);
        assert_eq!(nw.income, 2000.0);
        assert_eq!(nw.expenses, 500.0);
        assert_eq!(nw.invested, 750.0);
        assert_eq!(nw.net_worth, 2250.0);
        assert_eq!(nw.transaction_count, 3);
    }

    #[test]
    fn test_net_worth_empty() {
        let nw = get_net_worth(&[], &[]);
        assert_eq!(nw.net_worth, 0.0);
    }

    #[test]
    fn test_composition() {
        let txns = vec![txn("income", 2000.0), txn("expense", 500.0)];
        let invs = vec![
            inv("buy", "ETF", 1000.0),
            inv("buy", "stock", 300.0),
            inv("sell", "etf", 250.0),
            inv("buy", "Crypto", 50.0),
            inv("sell", "Crypto", 50.0),
        ];
        let data = get_composition(&txns, &invs);
        let names: Vec<&str> = data.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Liquidity", "ETF", "Stocks"]);
        assert_eq!(data.items[0].value, 1500.0);
        assert_eq!(data.items[1].value, 750.0);
        assert_eq!(data.total, 2550.0);
        let pct: f64 = data.items.iter().map(|c| c.pct).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_composition_empty() {
        let data = get_composition(&[], &[]);
        assert!(data.items.is_empty());
        assert_eq!(data.total, 0.0);
    }

    #[test]
    fn test_expense_breakdown() {
        let cats = vec![
            Category { id: "1".into(), name: "Groceries".into() },
            Category { id: "2".into(), name: "Transport".into() },
        ];
        let mut food = txn("expense", 60.0);
        food.category_id = Some("1".into());
        let mut food2 = txn("expense", 40.0);
        food2.id = "food2".into();
        food2.category_id = Some("1".into());
        let mut bus = txn("expense", 25.0);
        bus.category_id = Some("2".into());
        let stray = txn("expense", 75.0);
        let pay = txn("income", 3000.0);

        let data = get_expense_breakdown(&[food, food2, bus, stray, pay], &cats);
        assert_eq!(data.total, 200.0);
        let names: Vec<&str> = data.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Uncategorized", "Transport"]);
        assert_eq!(data.categories[0].count, 2);
        assert!((data.categories[0].pct - 50.0).abs() < 1e-9);
    }
}
