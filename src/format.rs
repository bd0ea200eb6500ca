//! Formatting money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::transaction::TransactionType;

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$12.30".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = if number < 0.0 {
        NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"))
    } else {
        POSITIVE_FMT.get_or_init(|| currency_formatter("$"))
    };

    let formatted_string = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => return "$0.00".to_owned(),
        Some(formatter) => formatter.fmt_string(number.abs()),
        None => return format!("{}${:.2}", if number < 0.0 { "-" } else { "" }, number.abs()),
    };

    // numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and
    // "12.00" as "12".
    match formatted_string.find('.') {
        Some(point) => {
            let decimals = formatted_string.len() - point - 1;
            format!("{formatted_string}{}", "0".repeat(2usize.saturating_sub(decimals)))
        }
        None => format!("{formatted_string}.00"),
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

/// Format a transaction amount with a sign showing which way the money moved,
/// e.g. "+$42.50" for income and "-$42.50" for an expense.
pub fn format_amount_with_sign(amount: f64, transaction_type: TransactionType) -> String {
    let sign = match transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!("{sign}{}", format_currency(amount.abs()))
}
