//! Balance reconciliation engine
//!
//! Every account balance equals its opening balance plus the effect of every
//! stored transaction that references it. An expense debits its source
//! account; a settlement debits the source and credits the target.
//!
//! Create, update and delete all reduce to the same step: compute one net
//! delta per distinct account from the old and new versions of the record,
//! then, under the ledger lock, read each balance fresh, add its delta and
//! commit the balances together with the record change.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Account, AccountId, AccountType, Money, Transaction, TransactionDraft, TransactionId};
use crate::storage::{LedgerCommit, LedgerGuard, RecordChange, Storage};

/// Balance effect of a single transaction on each account it references
pub fn effects(txn: &Transaction) -> Vec<(AccountId, Money)> {
    let mut effects = vec![(txn.account_id, -txn.amount)];
    if txn.is_settlement {
        if let Some(target) = txn.target_account_id {
            effects.push((target, txn.amount));
        }
    }
    effects
}

/// Net balance change per account when `old` is replaced by `new`
///
/// `None` on the old side is a create, `None` on the new side a delete. Every
/// account touched by either version appears in the result, possibly with a
/// zero delta.
pub fn net_deltas(
    old: Option<&Transaction>,
    new: Option<&Transaction>,
) -> SpendwiseResult<BTreeMap<AccountId, Money>> {
    let mut deltas = BTreeMap::new();

    let reversed = old
        .into_iter()
        .flat_map(effects)
        .map(|(id, effect)| (id, -effect));
    let applied = new.into_iter().flat_map(effects);

    for (id, change) in reversed.chain(applied) {
        let entry = deltas.entry(id).or_insert_with(Money::zero);
        *entry = entry
            .checked_add(change)
            .ok_or_else(|| SpendwiseError::InvalidAmount("amount out of range".into()))?;
    }

    Ok(deltas)
}

/// An account whose stored balance disagrees with its transactions
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceMismatch {
    pub account_id: AccountId,
    pub account_name: String,
    pub expected: Money,
    pub actual: Money,
}

impl BalanceMismatch {
    /// `actual - expected`, or `None` when a tampered balance is too far off
    pub fn difference(&self) -> Option<Money> {
        self.actual.checked_sub(self.expected)
    }
}

/// Applies transaction changes to account balances
pub struct LedgerEngine<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerEngine<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction and apply its effect
    pub fn apply_create(&self, draft: TransactionDraft) -> SpendwiseResult<Transaction> {
        let draft = self.check_draft(draft)?;
        let txn = Transaction::from_draft(draft);

        let guard = self.storage.ledger_guard()?;
        let accounts_before = self.commit(&guard, None, Some(&txn), RecordChange::Upsert(txn.clone()))?;
        drop(guard);

        info!(transaction = %txn.id, amount = %txn.amount, settlement = txn.is_settlement, "Transaction created");
        self.audit(
            AuditEntry::create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.to_string()),
                &txn,
            ),
            accounts_before,
        )?;

        Ok(txn)
    }

    /// Replace the editable fields of a stored transaction
    ///
    /// The stored record's own references are reversed and the draft's are
    /// applied, netted per account.
    pub fn apply_update(
        &self,
        id: TransactionId,
        draft: TransactionDraft,
    ) -> SpendwiseResult<Transaction> {
        self.apply_update_with(id, |_| draft)
    }

    /// Like [`apply_update`](Self::apply_update), with the draft built from
    /// the stored record as read under the ledger lock
    pub fn apply_update_with<F>(&self, id: TransactionId, build: F) -> SpendwiseResult<Transaction>
    where
        F: FnOnce(&Transaction) -> TransactionDraft,
    {
        let guard = self.storage.ledger_guard()?;
        let old = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendwiseError::transaction_not_found(id.to_string()))?;
        let draft = self.check_draft(build(&old))?;
        let updated = old.apply_draft(draft);
        let accounts_before = self.commit(
            &guard,
            Some(&old),
            Some(&updated),
            RecordChange::Upsert(updated.clone()),
        )?;
        drop(guard);

        info!(transaction = %id, "Transaction updated");
        self.audit(
            AuditEntry::update(
                EntityType::Transaction,
                id.to_string(),
                Some(updated.to_string()),
                &old,
                &updated,
            ),
            accounts_before,
        )?;

        Ok(updated)
    }

    /// Reverse a stored transaction's effect and remove it
    pub fn apply_delete(&self, id: TransactionId) -> SpendwiseResult<Transaction> {
        let guard = self.storage.ledger_guard()?;
        let old = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendwiseError::transaction_not_found(id.to_string()))?;
        let accounts_before = self.commit(&guard, Some(&old), None, RecordChange::Delete(id))?;
        drop(guard);

        info!(transaction = %id, "Transaction deleted");
        self.audit(
            AuditEntry::delete(
                EntityType::Transaction,
                id.to_string(),
                Some(old.to_string()),
                &old,
            ),
            accounts_before,
        )?;

        Ok(old)
    }

    /// Recompute every balance from the transactions and report mismatches
    pub fn verify(&self) -> SpendwiseResult<Vec<BalanceMismatch>> {
        let _guard = self.storage.ledger_guard()?;
        let accounts = self.storage.accounts.get_all()?;

        let mut expected: BTreeMap<AccountId, Money> = accounts
            .iter()
            .map(|a| (a.id, a.opening_balance))
            .collect();

        for txn in self.storage.transactions.get_all()? {
            for (id, effect) in effects(&txn) {
                match expected.get_mut(&id) {
                    Some(balance) => {
                        *balance = balance.checked_add(effect).ok_or_else(|| {
                            SpendwiseError::InvalidAmount(format!(
                                "expected balance of {} out of range",
                                id
                            ))
                        })?
                    }
                    None => warn!(transaction = %txn.id, account = %id, "Transaction references a missing account"),
                }
            }
        }

        let mismatches: Vec<_> = accounts
            .into_iter()
            .filter_map(|account| {
                let expected = expected.get(&account.id).copied()?;
                (expected != account.balance).then(|| BalanceMismatch {
                    account_id: account.id,
                    account_name: account.name,
                    expected,
                    actual: account.balance,
                })
            })
            .collect();

        if !mismatches.is_empty() {
            warn!(count = mismatches.len(), "Balance mismatches found");
        }
        Ok(mismatches)
    }

    /// Precondition checks that need no account lookup
    fn check_draft(&self, mut draft: TransactionDraft) -> SpendwiseResult<TransactionDraft> {
        if draft.amount.is_negative() {
            return Err(SpendwiseError::InvalidAmount(format!(
                "{} (must not be negative)",
                draft.amount
            )));
        }
        if draft.amount > Money::MAX {
            return Err(SpendwiseError::InvalidAmount(format!(
                "{} (must not exceed {})",
                draft.amount,
                Money::MAX
            )));
        }

        if draft.is_settlement {
            if draft.target_account_id.is_none() {
                return Err(SpendwiseError::MissingSettlementTarget);
            }
        } else {
            draft.target_account_id = None;
        }

        draft
            .validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        Ok(draft)
    }

    /// Resolve accounts, compute balances and commit under the guard
    ///
    /// Returns the touched accounts as they were before the commit.
    fn commit(
        &self,
        guard: &LedgerGuard<'_>,
        old: Option<&Transaction>,
        new: Option<&Transaction>,
        record: RecordChange,
    ) -> SpendwiseResult<Vec<(Account, Money)>> {
        let deltas = net_deltas(old, new)?;

        // Resolve every referenced account before anything is written
        let mut touched = Vec::with_capacity(deltas.len());
        for (id, delta) in &deltas {
            let account = self
                .storage
                .accounts
                .get(*id)?
                .ok_or_else(|| SpendwiseError::account_not_found(id.to_string()))?;
            touched.push((account, *delta));
        }

        if let Some(target) = new.filter(|t| t.is_settlement).and_then(|t| t.target_account_id) {
            if let Some((account, _)) = touched.iter().find(|(a, _)| a.id == target) {
                if account.account_type != AccountType::CreditCard {
                    warn!(account = %account.name, "Settlement target is not a credit card");
                }
            }
        }

        let mut balances = Vec::new();
        let mut before = Vec::new();
        for (account, delta) in touched {
            if delta.is_zero() {
                continue;
            }
            let balance = account.balance.checked_add(delta).ok_or_else(|| {
                SpendwiseError::InvalidAmount(format!("balance of {} out of range", account.name))
            })?;
            debug!(account = %account.id, delta = %delta, balance = %balance, "Balance change");
            balances.push((account.id, balance));
            before.push((account, balance));
        }

        self.storage
            .commit_ledger(guard, LedgerCommit { balances, record })?;

        Ok(before)
    }

    /// Audit the record change plus every balance it moved, in one append
    fn audit(&self, record: AuditEntry, accounts: Vec<(Account, Money)>) -> SpendwiseResult<()> {
        let mut entries = vec![record];
        for (before, balance) in accounts {
            let mut after = before.clone();
            after.balance = balance;
            entries.push(AuditEntry::update(
                EntityType::Account,
                before.id.to_string(),
                Some(before.name.clone()),
                &before,
                &after,
            ));
        }
        self.storage.audit().log_batch(&entries)
    }
}
