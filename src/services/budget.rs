//! Budget service
//!
//! Category budget goals and progress against them. Goals are read-only with
//! respect to balances; settlements never count as spending.

use std::fmt;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::budget::default_goals;
use crate::models::{BudgetGoal, BudgetGoalId, Category, Money, Transaction};
use crate::storage::{ChangeOperation, Collection, Storage};

/// Service for budget goal management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// How close spending is to a goal's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// At most 70% used
    OnTrack,
    /// Above 70%
    Warning,
    /// Above 90%
    Critical,
    /// Limit reached or exceeded
    Exceeded,
}

impl BudgetStatus {
    /// Classify by the uncapped share of the limit already spent
    pub fn from_ratio(spent: Money, limit: Money) -> Self {
        if !limit.is_positive() {
            return Self::Exceeded;
        }
        // Compare in cents to avoid rounding at the band edges
        let spent = spent.cents() as i128 * 100;
        let limit = limit.cents() as i128;
        if spent >= limit * 100 {
            Self::Exceeded
        } else if spent > limit * 90 {
            Self::Critical
        } else if spent > limit * 70 {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on track"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::Exceeded => write!(f, "limit exceeded"),
        }
    }
}

/// Spending against one goal
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    pub goal: BudgetGoal,
    pub spent: Money,
    /// Share of the limit used, capped at 100
    pub percent: u8,
    /// `limit - spent`; negative once over budget
    pub remaining: Money,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    /// Progress of `goal` given every stored transaction
    pub fn compute(goal: &BudgetGoal, transactions: &[Transaction]) -> SpendwiseResult<Self> {
        let out_of_range = || {
            SpendwiseError::InvalidAmount(format!("spending on {} out of range", goal.category))
        };
        let spent = Money::checked_sum(
            transactions
                .iter()
                .filter(|t| t.is_spending() && t.category == goal.category && goal.covers(t.date))
                .map(|t| t.amount),
        )
        .ok_or_else(out_of_range)?;
        let remaining = goal.limit.checked_sub(spent).ok_or_else(out_of_range)?;

        let percent = if goal.limit.is_positive() {
            let raw = spent.cents().max(0) as i128 * 100 / goal.limit.cents() as i128;
            raw.min(100) as u8
        } else {
            100
        };

        Ok(Self {
            goal: goal.clone(),
            spent,
            percent,
            remaining,
            status: BudgetStatus::from_ratio(spent, goal.limit),
        })
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal, or update it when `id` is given
    pub fn save_goal(
        &self,
        id: Option<BudgetGoalId>,
        category: Category,
        limit: Money,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
    ) -> SpendwiseResult<BudgetGoal> {
        let guard = self.storage.ledger_guard()?;
        let before = match id {
            Some(id) => Some(
                self.storage
                    .budgets
                    .get(id)?
                    .ok_or_else(|| SpendwiseError::goal_not_found(id.to_string()))?,
            ),
            None => None,
        };

        let goal = match &before {
            Some(existing) => BudgetGoal {
                category,
                limit,
                valid_from,
                valid_until,
                updated_at: chrono::Utc::now(),
                ..existing.clone()
            },
            None => BudgetGoal::new(category, limit).with_window(valid_from, valid_until),
        };

        goal.validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(goal.clone())?;
        self.storage.budgets.save()?;
        drop(guard);

        let label = Some(goal.category.label().to_string());
        match &before {
            Some(before) => {
                self.storage.log_update(
                    EntityType::BudgetGoal,
                    goal.id.to_string(),
                    label,
                    before,
                    &goal,
                )?;
            }
            None => {
                self.storage
                    .log_create(EntityType::BudgetGoal, goal.id.to_string(), label, &goal)?;
            }
        }
        let operation = if before.is_some() {
            ChangeOperation::Updated
        } else {
            ChangeOperation::Created
        };
        self.storage
            .notify(Collection::Budgets, operation, vec![goal.id.to_string()]);

        Ok(goal)
    }

    pub fn delete_goal(&self, id: BudgetGoalId) -> SpendwiseResult<BudgetGoal> {
        let guard = self.storage.ledger_guard()?;
        let goal = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| SpendwiseError::goal_not_found(id.to_string()))?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;
        drop(guard);

        self.storage.log_delete(
            EntityType::BudgetGoal,
            goal.id.to_string(),
            Some(goal.category.label().to_string()),
            &goal,
        )?;
        self.storage
            .notify(Collection::Budgets, ChangeOperation::Deleted, vec![goal.id.to_string()]);

        Ok(goal)
    }

    pub fn list(&self) -> SpendwiseResult<Vec<BudgetGoal>> {
        self.storage.budgets.get_all()
    }

    /// Find a goal by ID, short ID or category (when it has exactly one goal)
    pub fn find(&self, identifier: &str) -> SpendwiseResult<Option<BudgetGoal>> {
        if let Ok(id) = identifier.trim().parse::<BudgetGoalId>() {
            return self.storage.budgets.get(id);
        }

        let goals = self.list()?;
        if let Some(goal) = goals.iter().find(|g| g.id.matches_short(identifier.trim())) {
            return Ok(Some(goal.clone()));
        }

        let Some(category) = Category::parse(identifier) else {
            return Ok(None);
        };
        let mut matching: Vec<_> = goals.into_iter().filter(|g| g.category == category).collect();
        match matching.len() {
            0 => Ok(None),
            1 => Ok(matching.pop()),
            n => Err(SpendwiseError::Validation(format!(
                "{} has {} goals, use the goal id",
                category, n
            ))),
        }
    }

    /// Progress for every goal
    pub fn progress(&self) -> SpendwiseResult<Vec<BudgetProgress>> {
        let transactions = self.storage.transactions.get_all()?;
        self.list()?
            .iter()
            .map(|goal| BudgetProgress::compute(goal, &transactions))
            .collect()
    }

    /// Seed the default goals when the user has none; returns how many were added
    pub fn seed_defaults(&self) -> SpendwiseResult<usize> {
        let guard = self.storage.ledger_guard()?;
        if self.storage.budgets.count()? > 0 {
            return Ok(0);
        }

        let goals = default_goals();
        for goal in &goals {
            self.storage.budgets.upsert(goal.clone())?;
        }
        self.storage.budgets.save()?;
        drop(guard);

        for goal in &goals {
            self.storage.log_create(
                EntityType::BudgetGoal,
                goal.id.to_string(),
                Some(goal.category.label().to_string()),
                goal,
            )?;
        }
        self.storage.notify(
            Collection::Budgets,
            ChangeOperation::Created,
            goals.iter().map(|g| g.id.to_string()).collect(),
        );

        Ok(goals.len())
    }
}
