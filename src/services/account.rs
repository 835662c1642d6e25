//! Account service
//!
//! Account CRUD. Balances are never edited here; they only move through the
//! ledger engine.

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Account, AccountId, AccountType, Money};
use crate::storage::{ChangeOperation, Collection, Storage};

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account with its derived display values
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Overpayment on a credit card
    pub surplus: Option<Money>,
    pub transaction_count: usize,
}

/// Partial edit of an account
#[derive(Debug, Clone, Default)]
pub struct AccountEdit {
    pub name: Option<String>,
    /// `Some(None)` removes the limit
    pub credit_limit: Option<Option<Money>>,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        opening_balance: Money,
        credit_limit: Option<Money>,
    ) -> SpendwiseResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpendwiseError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if opening_balance.abs() > Money::MAX {
            return Err(SpendwiseError::InvalidAmount(format!(
                "{} (opening balance must not exceed {})",
                opening_balance,
                Money::MAX
            )));
        }

        let mut account = Account::with_opening_balance(name, account_type, opening_balance);
        account.credit_limit = credit_limit;
        account
            .validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        {
            let _guard = self.storage.ledger_guard()?;
            if self.storage.accounts.name_exists(name, None)? {
                return Err(SpendwiseError::Duplicate {
                    entity_type: "Account",
                    identifier: name.to_string(),
                });
            }
            self.storage.accounts.upsert(account.clone())?;
            if let Err(err) = self.storage.accounts.save() {
                self.storage.accounts.delete(account.id)?;
                return Err(err);
            }
        }

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;
        self.storage.notify(
            Collection::Accounts,
            ChangeOperation::Created,
            vec![account.id.to_string()],
        );

        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> SpendwiseResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name, full ID or short ID (`acc-1a2b3c4d`)
    pub fn find(&self, identifier: &str) -> SpendwiseResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.trim().parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .accounts
            .get_all()?
            .into_iter()
            .filter(|a| a.id.matches_short(identifier.trim()))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SpendwiseError::Validation(format!(
                "'{}' matches {} accounts, use a longer id",
                identifier, n
            ))),
        }
    }

    /// Like [`find`](Self::find), but a miss is `AccountNotFound`
    pub fn require(&self, identifier: &str) -> SpendwiseResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| SpendwiseError::account_not_found(identifier))
    }

    pub fn list(&self) -> SpendwiseResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// All accounts with surplus and usage
    pub fn list_summaries(&self) -> SpendwiseResult<Vec<AccountSummary>> {
        self.list()?
            .into_iter()
            .map(|account| self.summary(account))
            .collect()
    }

    pub fn summary(&self, account: Account) -> SpendwiseResult<AccountSummary> {
        let transaction_count = self.storage.transactions.get_by_account(account.id)?.len();
        Ok(AccountSummary {
            surplus: account.surplus(),
            transaction_count,
            account,
        })
    }

    /// Rename an account or change its credit limit
    pub fn update(&self, id: AccountId, edit: AccountEdit) -> SpendwiseResult<Account> {
        let guard = self.storage.ledger_guard()?;
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| SpendwiseError::account_not_found(id.to_string()))?;
        let before = account.clone();

        if let Some(name) = edit.name {
            let name = name.trim();
            if self.storage.accounts.name_exists(name, Some(id))? {
                return Err(SpendwiseError::Duplicate {
                    entity_type: "Account",
                    identifier: name.to_string(),
                });
            }
            account.name = name.to_string();
        }

        if let Some(limit) = edit.credit_limit {
            account.credit_limit = limit;
        }

        account
            .validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        if account == before {
            return Ok(account);
        }
        account.updated_at = chrono::Utc::now();

        self.storage.accounts.upsert(account.clone())?;
        if let Err(err) = self.storage.accounts.save() {
            self.storage.accounts.upsert(before)?;
            return Err(err);
        }
        drop(guard);

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;
        self.storage.notify(
            Collection::Accounts,
            ChangeOperation::Updated,
            vec![account.id.to_string()],
        );

        Ok(account)
    }

    /// Delete an account that no transaction references
    pub fn delete(&self, id: AccountId) -> SpendwiseResult<Account> {
        let guard = self.storage.ledger_guard()?;
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| SpendwiseError::account_not_found(id.to_string()))?;

        let referencing = self.storage.transactions.get_by_account(id)?.len();
        if referencing > 0 {
            return Err(SpendwiseError::Validation(format!(
                "Account '{}' is used by {} transaction(s); delete or move them first",
                account.name, referencing
            )));
        }

        self.storage.accounts.delete(id)?;
        if let Err(err) = self.storage.accounts.save() {
            self.storage.accounts.upsert(account)?;
            return Err(err);
        }
        drop(guard);

        self.storage.log_delete(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;
        self.storage.notify(
            Collection::Accounts,
            ChangeOperation::Deleted,
            vec![account.id.to_string()],
        );

        Ok(account)
    }

    /// Sum of all account balances
    pub fn total_balance(&self) -> SpendwiseResult<Money> {
        Money::checked_sum(self.list()?.iter().map(|a| a.balance))
            .ok_or_else(|| SpendwiseError::InvalidAmount("total balance out of range".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpendwisePaths;
    use crate::models::{TransactionDraft, UserId};
    use crate::services::TransactionService;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, UserId::new("acct").unwrap()).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create(
                "Visa",
                AccountType::CreditCard,
                Money::from_units(-200),
                Some(Money::from_units(5000)),
            )
            .unwrap();

        assert_eq!(account.balance, Money::from_units(-200));
        assert_eq!(account.opening_balance, Money::from_units(-200));
        assert_eq!(account.credit_limit, Some(Money::from_units(5000)));
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicates_and_bad_limits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        service
            .create("Checking", AccountType::Checking, Money::zero(), None)
            .unwrap();

        let result = service.create("checking", AccountType::Savings, Money::zero(), None);
        assert!(matches!(result, Err(SpendwiseError::Duplicate { .. })));

        let result = service.create(
            "Savings",
            AccountType::Savings,
            Money::zero(),
            Some(Money::from_units(10)),
        );
        assert!(result.unwrap_err().is_validation());

        let result = service.create("  ", AccountType::Cash, Money::zero(), None);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_creates_from_separate_handles_are_kept() {
        let (temp_dir, first) = create_test_storage();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let second = Storage::open(&paths, UserId::new("acct").unwrap()).unwrap();
        second.load_all().unwrap();

        AccountService::new(&first)
            .create("Checking", AccountType::Checking, Money::zero(), None)
            .unwrap();
        AccountService::new(&second)
            .create("Savings", AccountType::Savings, Money::zero(), None)
            .unwrap();

        // The second handle's stale view must not hide the first account
        let duplicate =
            AccountService::new(&second).create("CHECKING", AccountType::Cash, Money::zero(), None);
        assert!(matches!(duplicate, Err(SpendwiseError::Duplicate { .. })));

        let reopened = Storage::open(&paths, UserId::new("acct").unwrap()).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.accounts.count().unwrap(), 2);
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let created = service
            .create("My Wallet", AccountType::Cash, Money::zero(), None)
            .unwrap();

        assert_eq!(service.find("my wallet").unwrap().unwrap().id, created.id);
        assert_eq!(
            service.find(&created.id.to_string()).unwrap().unwrap().id,
            created.id
        );
        assert!(service.require("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_name_and_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let card = service
            .create("Visa", AccountType::CreditCard, Money::from_units(1200), None)
            .unwrap();

        let updated = service
            .update(
                card.id,
                AccountEdit {
                    name: Some("Visa Gold".into()),
                    credit_limit: Some(Some(Money::from_units(1000))),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Visa Gold");
        assert_eq!(updated.balance, Money::from_units(1200));
        assert_eq!(updated.surplus(), Some(Money::from_units(200)));
    }

    #[test]
    fn test_delete_refused_while_referenced() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let wallet = service
            .create("Wallet", AccountType::Cash, Money::from_units(50), None)
            .unwrap();

        let txn = TransactionService::new(&storage)
            .create(TransactionDraft::expense(
                wallet.id,
                Money::from_units(5),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ))
            .unwrap();

        assert!(service.delete(wallet.id).unwrap_err().is_validation());

        TransactionService::new(&storage).delete(txn.id).unwrap();
        service.delete(wallet.id).unwrap();
        assert!(service.get(wallet.id).unwrap().is_none());
    }

    #[test]
    fn test_total_balance_and_summaries() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Checking", AccountType::Checking, Money::from_units(500), None)
            .unwrap();
        service
            .create(
                "Visa",
                AccountType::CreditCard,
                Money::from_units(-200),
                Some(Money::from_units(1000)),
            )
            .unwrap();

        assert_eq!(service.total_balance().unwrap(), Money::from_units(300));

        let summaries = service.list_summaries().unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.surplus.is_none()));
    }
}
