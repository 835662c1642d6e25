//! Transaction model
//!
//! A transaction is either a simple expense debited from one account, or a
//! settlement that moves money from a funding account onto a credit card.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, Mood};
use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// The user-editable fields of a transaction
///
/// Used both to create a transaction and as the replacement data when a
/// transaction is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub amount: Money,
    pub category: Category,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mood: Mood,
    pub account_id: AccountId,
    #[serde(default)]
    pub is_settlement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account_id: Option<AccountId>,
}

impl TransactionDraft {
    /// Draft for a simple expense with default category and mood
    pub fn expense(account_id: AccountId, amount: Money, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            amount,
            category: Category::default(),
            date,
            time,
            description: String::new(),
            mood: Mood::default(),
            account_id,
            is_settlement: false,
            target_account_id: None,
        }
    }

    /// Draft for a settlement paying `target` from `source`
    pub fn settlement(
        source: AccountId,
        target: AccountId,
        amount: Money,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            is_settlement: true,
            target_account_id: Some(target),
            ..Self::expense(source, amount, date, time)
        }
    }

    /// Validate the non-financial fields
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }
        if self.is_settlement && self.target_account_id == Some(self.account_id) {
            return Err(TransactionValidationError::SelfSettlement);
        }
        Ok(())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Non-negative amount
    pub amount: Money,

    pub category: Category,

    pub date: NaiveDate,

    pub time: NaiveTime,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub mood: Mood,

    /// Source account (debited)
    pub account_id: AccountId,

    /// Whether this pays down `target_account_id`
    #[serde(default)]
    pub is_settlement: bool,

    /// Credited account, only set for settlements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account_id: Option<AccountId>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction from a draft
    pub fn from_draft(draft: TransactionDraft) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            time: draft.time,
            description: draft.description,
            mood: draft.mood,
            account_id: draft.account_id,
            is_settlement: draft.is_settlement,
            target_account_id: draft.target_account_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping identity and creation time
    pub fn apply_draft(&self, draft: TransactionDraft) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            updated_at: Utc::now(),
            ..Self::from_draft(draft)
        }
    }

    /// The editable fields as a draft
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            amount: self.amount,
            category: self.category,
            date: self.date,
            time: self.time,
            description: self.description.clone(),
            mood: self.mood,
            account_id: self.account_id,
            is_settlement: self.is_settlement,
            target_account_id: self.target_account_id,
        }
    }

    /// Check whether this transaction references an account on either leg
    pub fn references(&self, account_id: AccountId) -> bool {
        self.account_id == account_id
            || (self.is_settlement && self.target_account_id == Some(account_id))
    }

    /// Whether this transaction counts as spending (settlements are transfers)
    pub fn is_spending(&self) -> bool {
        !self.is_settlement
    }

    /// Timestamp used for ordering (date, then time)
    pub fn occurred_at(&self) -> chrono::NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date,
            self.time.format("%H:%M"),
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    DescriptionTooLong(usize),
    SelfSettlement,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
            Self::SelfSettlement => write!(f, "An account cannot settle itself"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(21, 30, 0).unwrap()
    }

    #[test]
    fn test_from_draft() {
        let account = AccountId::new();
        let mut draft = TransactionDraft::expense(account, Money::from_units(12), date(), time());
        draft.category = Category::FoodDining;
        draft.mood = Mood::Tired;

        let txn = Transaction::from_draft(draft.clone());
        assert_eq!(txn.amount, Money::from_units(12));
        assert_eq!(txn.category, Category::FoodDining);
        assert_eq!(txn.mood, Mood::Tired);
        assert_eq!(txn.to_draft(), draft);
    }

    #[test]
    fn test_apply_draft_keeps_identity() {
        let account = AccountId::new();
        let txn = Transaction::from_draft(TransactionDraft::expense(
            account,
            Money::from_units(12),
            date(),
            time(),
        ));

        let mut draft = txn.to_draft();
        draft.amount = Money::from_units(30);
        let edited = txn.apply_draft(draft);

        assert_eq!(edited.id, txn.id);
        assert_eq!(edited.created_at, txn.created_at);
        assert_eq!(edited.amount, Money::from_units(30));
    }

    #[test]
    fn test_references() {
        let source = AccountId::new();
        let target = AccountId::new();
        let other = AccountId::new();

        let settlement = Transaction::from_draft(TransactionDraft::settlement(
            source,
            target,
            Money::from_units(100),
            date(),
            time(),
        ));
        assert!(settlement.references(source));
        assert!(settlement.references(target));
        assert!(!settlement.references(other));
        assert!(!settlement.is_spending());
    }

    #[test]
    fn test_validation() {
        let account = AccountId::new();
        let mut draft = TransactionDraft::expense(account, Money::from_units(1), date(), time());
        assert!(draft.validate().is_ok());

        draft.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(
            draft.validate(),
            Err(TransactionValidationError::DescriptionTooLong(_))
        ));

        let self_settle =
            TransactionDraft::settlement(account, account, Money::from_units(1), date(), time());
        assert_eq!(
            self_settle.validate(),
            Err(TransactionValidationError::SelfSettlement)
        );
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let txn = Transaction::from_draft(TransactionDraft::settlement(
            AccountId::new(),
            AccountId::new(),
            Money::from_units(5),
            date(),
            time(),
        ));
        let json = serde_json::to_value(&txn).unwrap();
        assert!(json.get("isSettlement").is_some());
        assert!(json.get("targetAccountId").is_some());
        assert!(json.get("accountId").is_some());
    }
}
