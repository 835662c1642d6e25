//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Currency, Money};
use crate::services::account::AccountSummary;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Surplus")]
    surplus: String,
    #[tabled(rename = "Txns")]
    transactions: usize,
}

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary], currency: Currency) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows: Vec<AccountRow> = summaries
        .iter()
        .map(|s| AccountRow {
            id: s.account.id.to_string(),
            name: s.account.name.clone(),
            account_type: s.account.account_type.to_string(),
            balance: s.account.balance.format_with_symbol(currency.symbol),
            limit: s
                .account
                .credit_limit
                .map(|l| l.format_with_symbol(currency.symbol))
                .unwrap_or_default(),
            surplus: s
                .surplus
                .map(|l| l.format_with_symbol(currency.symbol))
                .unwrap_or_default(),
            transactions: s.transaction_count,
        })
        .collect();

    let total = Money::checked_sum(summaries.iter().map(|s| s.account.balance))
        .map(|total| total.format_with_symbol(currency.symbol))
        .unwrap_or_else(|| "out of range".to_string());

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output.push_str(&format!("Total balance: {}\n", total));
    output
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary, currency: Currency) -> String {
    let account = &summary.account;
    let money = |m: Money| m.format_with_symbol(currency.symbol);

    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:            {}\n", account.account_type));
    output.push_str(&format!("  ID:              {}\n", account.id));
    output.push('\n');
    output.push_str(&format!("  Opening Balance: {}\n", money(account.opening_balance)));
    output.push_str(&format!("  Current Balance: {}\n", money(account.balance)));

    if let Some(limit) = account.credit_limit {
        output.push_str(&format!("  Credit Limit:    {}\n", money(limit)));
    }
    if let Some(surplus) = summary.surplus {
        output.push_str(&format!("  Surplus:         {} (overpaid)\n", money(surplus)));
    }
    output.push_str(&format!("  Transactions:    {}\n", summary.transaction_count));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};

    fn summary(name: &str, account_type: AccountType, balance: i64) -> AccountSummary {
        let account = Account::with_opening_balance(name, account_type, Money::from_units(balance));
        AccountSummary {
            surplus: account.surplus(),
            account,
            transaction_count: 0,
        }
    }

    #[test]
    fn test_format_account_list() {
        let summaries = vec![
            summary("Checking", AccountType::Checking, 1000),
            summary("Savings", AccountType::Savings, 5000),
        ];

        let output = format_account_list(&summaries, Currency::by_code("USD").unwrap());
        assert!(output.contains("Checking"));
        assert!(output.contains("Savings"));
        assert!(output.contains("Total balance: $ 6,000.00"));
    }

    #[test]
    fn test_format_empty_list() {
        let output = format_account_list(&[], Currency::default_currency());
        assert!(output.contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details_shows_surplus() {
        let mut card = summary("Visa", AccountType::CreditCard, 1200);
        card.account.credit_limit = Some(Money::from_units(1000));
        card.surplus = card.account.surplus();

        let output = format_account_details(&card, Currency::by_code("USD").unwrap());
        assert!(output.contains("Visa"));
        assert!(output.contains("Credit Card"));
        assert!(output.contains("Surplus:         $ 200.00"));
    }
}
