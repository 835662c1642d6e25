//! Transaction display formatting
//!
//! Register tables and detail views. Account ids are shown by name when
//! the caller can resolve them.

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AccountId, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Mood")]
    mood: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn account_label(names: &HashMap<AccountId, String>, id: AccountId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

/// Source account, with the target for settlements (`Checking -> Visa`)
fn route(txn: &Transaction, names: &HashMap<AccountId, String>) -> String {
    let source = account_label(names, txn.account_id);
    match (txn.is_settlement, txn.target_account_id) {
        (true, Some(target)) => format!("{} -> {}", source, account_label(names, target)),
        _ => source,
    }
}

/// Format a list of transactions as a register table
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &HashMap<AccountId, String>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            time: txn.time.format("%H:%M").to_string(),
            category: txn.category.to_string(),
            account: route(txn, names),
            amount: txn.amount.to_string(),
            mood: txn.mood.to_string(),
            description: truncate(&txn.description, 30),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    names: &HashMap<AccountId, String>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {} {}\n",
        txn.date.format("%Y-%m-%d"),
        txn.time.format("%H:%M")
    ));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Mood:        {}\n", txn.mood));

    if txn.is_settlement {
        output.push_str("Type:        Settlement\n");
        output.push_str(&format!("From:        {}\n", account_label(names, txn.account_id)));
        if let Some(target) = txn.target_account_id {
            output.push_str(&format!("To:          {}\n", account_label(names, target)));
        }
    } else {
        output.push_str(&format!("Account:     {}\n", account_label(names, txn.account_id)));
    }

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, TransactionDraft};
    use chrono::{NaiveDate, NaiveTime};

    fn settlement() -> (Transaction, HashMap<AccountId, String>) {
        let (source, target) = (AccountId::new(), AccountId::new());
        let txn = Transaction::from_draft(TransactionDraft {
            category: Category::BillsUtilities,
            description: "Card payment".into(),
            ..TransactionDraft::settlement(
                source,
                target,
                Money::from_units(100),
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveTime::from_hms_opt(18, 5, 0).unwrap(),
            )
        });
        let names = HashMap::from([(source, "Checking".to_string()), (target, "Visa".to_string())]);
        (txn, names)
    }

    #[test]
    fn test_format_register_shows_route() {
        let (txn, names) = settlement();
        let formatted = format_transaction_register(&[txn], &names);
        assert!(formatted.contains("2025-01-15"));
        assert!(formatted.contains("Checking -> Visa"));
        assert!(formatted.contains("100.00"));
    }

    #[test]
    fn test_format_empty_register() {
        let formatted = format_transaction_register(&[], &HashMap::new());
        assert!(formatted.contains("No transactions found"));
    }

    #[test]
    fn test_format_transaction_details() {
        let (txn, names) = settlement();
        let formatted = format_transaction_details(&txn, &names);
        assert!(formatted.contains("Settlement"));
        assert!(formatted.contains("To:          Visa"));
        assert!(formatted.contains("Card payment"));
    }

    #[test]
    fn test_unknown_account_falls_back_to_id() {
        let (txn, _) = settlement();
        let formatted = format_transaction_details(&txn, &HashMap::new());
        assert!(formatted.contains(&txn.account_id.to_string()));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        let result = truncate("A very long string", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with("..."));
        assert_eq!(truncate("مطعم الحي الجميل", 8).chars().count(), 8);
    }
}
