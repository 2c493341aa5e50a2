use crate::engine::{FieldDef, Value};

/// Format a float as a euro amount with thousands separators: €1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-\u{20ac}{with_commas}.{dec_part}")
    } else {
        format!("\u{20ac}{with_commas}.{dec_part}")
    }
}

/// Text for one table cell. Dates drop their time part when it is midnight,
/// money fields get a currency format, and missing values show an em dash.
pub fn cell(field: &FieldDef, value: &Value) -> String {
    match value {
        Value::Null => "\u{2014}".to_string(),
        Value::Number(n) if field.money => money(*n),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "€1,234.56");
        assert_eq!(money(-500.00), "-€500.00");
        assert_eq!(money(0.0), "€0.00");
        assert_eq!(money(1000000.99), "€1,000,000.99");
        assert_eq!(money(42.10), "€42.10");
    }

    #[test]
    fn test_cell() {
        let amount = FieldDef::money("amount", "Amount");
        let qty = FieldDef::number("quantity", "Qty");
        assert_eq!(cell(&amount, &Value::Number(1500.0)), "€1,500.00");
        assert_eq!(cell(&qty, &Value::Number(1.5)), "1.5");
        assert_eq!(cell(&qty, &Value::Null), "\u{2014}");
    }
}
