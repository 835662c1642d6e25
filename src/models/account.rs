//! Account model
//!
//! Represents financial accounts (checking, savings, credit cards, etc.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Checking account
    Checking,
    /// Savings account
    Savings,
    /// Credit card
    CreditCard,
    /// Investment account
    Investment,
    /// Cash/wallet
    Cash,
}

impl AccountType {
    /// Returns true for accounts that carry debt (credit cards)
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::CreditCard)
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "credit card" | "creditcard" | "card" => {
                Some(Self::CreditCard)
            }
            "investment" => Some(Self::Investment),
            "cash" | "wallet" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Investment => write!(f, "Investment"),
            Self::Cash => write!(f, "Cash"),
        }
    }
}

/// A financial account
///
/// `balance` is only ever changed by the ledger engine; `opening_balance`
/// is fixed at creation and anchors the reconciliation invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Main Wallet")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Balance when the account was created
    pub opening_balance: Money,

    /// Current balance
    pub balance: Money,

    /// Credit limit, meaningful for credit cards only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            opening_balance: Money::zero(),
            balance: Money::zero(),
            credit_limit: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an opening balance
    pub fn with_opening_balance(
        name: impl Into<String>,
        account_type: AccountType,
        opening_balance: Money,
    ) -> Self {
        let mut account = Self::new(name, account_type);
        account.opening_balance = opening_balance;
        account.balance = opening_balance;
        account
    }

    /// Overpayment on a credit card: `balance - credit_limit` when positive
    ///
    /// Derived for display only, never stored.
    pub fn surplus(&self) -> Option<Money> {
        if self.account_type != AccountType::CreditCard {
            return None;
        }
        let limit = self.credit_limit?;
        let surplus = self.balance.checked_sub(limit)?;
        surplus.is_positive().then_some(surplus)
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if let Some(limit) = self.credit_limit {
            if self.account_type != AccountType::CreditCard {
                return Err(AccountValidationError::CreditLimitOnNonCard);
            }
            if limit.is_negative() {
                return Err(AccountValidationError::NegativeCreditLimit);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    CreditLimitOnNonCard,
    NegativeCreditLimit,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::CreditLimitOnNonCard => {
                write!(f, "Only credit card accounts can have a credit limit")
            }
            Self::NegativeCreditLimit => write!(f, "Credit limit cannot be negative"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Checking", AccountType::Checking);
        assert_eq!(account.name, "Checking");
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.balance, Money::zero());
        assert_eq!(account.credit_limit, None);
    }

    #[test]
    fn test_with_opening_balance() {
        let account = Account::with_opening_balance(
            "Savings",
            AccountType::Savings,
            Money::from_cents(1_200_000),
        );
        assert_eq!(account.opening_balance.cents(), 1_200_000);
        assert_eq!(account.balance.cents(), 1_200_000);
    }

    #[test]
    fn test_surplus_only_when_over_limit() {
        let mut card =
            Account::with_opening_balance("Visa", AccountType::CreditCard, Money::from_units(1200));
        assert_eq!(card.surplus(), None);

        card.credit_limit = Some(Money::from_units(1000));
        assert_eq!(card.surplus(), Some(Money::from_units(200)));

        card.balance = Money::from_units(1000);
        assert_eq!(card.surplus(), None);

        card.balance = Money::from_units(-200);
        assert_eq!(card.surplus(), None);
    }

    #[test]
    fn test_surplus_ignored_for_non_cards() {
        let mut account =
            Account::with_opening_balance("Wallet", AccountType::Cash, Money::from_units(500));
        account.credit_limit = Some(Money::from_units(100));
        assert_eq!(account.surplus(), None);
    }

    #[test]
    fn test_validation() {
        let mut account = Account::new("Valid Name", AccountType::Checking);
        assert!(account.validate().is_ok());

        account.name = String::new();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "a".repeat(101);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NameTooLong(_))
        ));

        account.name = "Checking".into();
        account.credit_limit = Some(Money::from_units(100));
        assert_eq!(
            account.validate(),
            Err(AccountValidationError::CreditLimitOnNonCard)
        );
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(AccountType::parse("checking"), Some(AccountType::Checking));
        assert_eq!(AccountType::parse("SAVINGS"), Some(AccountType::Savings));
        assert_eq!(AccountType::parse("credit_card"), Some(AccountType::CreditCard));
        assert_eq!(AccountType::parse("Credit Card"), Some(AccountType::CreditCard));
        assert_eq!(AccountType::parse("invalid"), None);
    }

    #[test]
    fn test_display() {
        let account = Account::new("Visa", AccountType::CreditCard);
        assert_eq!(format!("{}", account), "Visa (Credit Card)");
    }
}
