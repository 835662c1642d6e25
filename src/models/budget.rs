//! Budget goal model
//!
//! A budget goal caps spending in one category, optionally within a
//! validity window. Goals never affect account balances.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::BudgetGoalId;
use super::money::Money;

/// A spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetGoal {
    /// Unique identifier
    pub id: BudgetGoalId,

    pub category: Category,

    /// Spending limit (must be positive)
    pub limit: Money,

    /// First day the goal applies (inclusive); open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,

    /// Last day the goal applies (inclusive); open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetGoal {
    /// Create a new open-ended goal
    pub fn new(category: Category, limit: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetGoalId::new(),
            category,
            limit,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Restrict the goal to a date window
    pub fn with_window(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.valid_from = from;
        self.valid_until = until;
        self
    }

    /// Check whether a date falls inside the validity window
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.valid_from.map_or(true, |from| date >= from)
            && self.valid_until.map_or(true, |until| date <= until)
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), BudgetGoalValidationError> {
        if !self.limit.is_positive() {
            return Err(BudgetGoalValidationError::NonPositiveLimit);
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if from > until {
                return Err(BudgetGoalValidationError::InvertedWindow { from, until });
            }
        }
        Ok(())
    }
}

impl fmt::Display for BudgetGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.limit)
    }
}

/// Validation errors for budget goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetGoalValidationError {
    NonPositiveLimit,
    InvertedWindow { from: NaiveDate, until: NaiveDate },
}

impl fmt::Display for BudgetGoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLimit => write!(f, "Budget limit must be greater than zero"),
            Self::InvertedWindow { from, until } => {
                write!(f, "Budget window starts ({}) after it ends ({})", from, until)
            }
        }
    }
}

impl std::error::Error for BudgetGoalValidationError {}

/// Goals seeded for a fresh user
pub fn default_goals() -> Vec<BudgetGoal> {
    vec![
        BudgetGoal::new(Category::FoodDining, Money::from_units(1500)),
        BudgetGoal::new(Category::Entertainment, Money::from_units(800)),
        BudgetGoal::new(Category::Shopping, Money::from_units(1000)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_open_ended_goal_covers_everything() {
        let goal = BudgetGoal::new(Category::Shopping, Money::from_units(100));
        assert!(goal.covers(d(1)));
        assert!(goal.covers(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()));
    }

    #[test]
    fn test_window_is_inclusive() {
        let goal = BudgetGoal::new(Category::Shopping, Money::from_units(100))
            .with_window(Some(d(10)), Some(d(20)));
        assert!(!goal.covers(d(9)));
        assert!(goal.covers(d(10)));
        assert!(goal.covers(d(20)));
        assert!(!goal.covers(d(21)));
    }

    #[test]
    fn test_validation() {
        let goal = BudgetGoal::new(Category::Health, Money::zero());
        assert_eq!(goal.validate(), Err(BudgetGoalValidationError::NonPositiveLimit));

        let goal = BudgetGoal::new(Category::Health, Money::from_units(10))
            .with_window(Some(d(20)), Some(d(10)));
        assert!(matches!(
            goal.validate(),
            Err(BudgetGoalValidationError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn test_default_goals() {
        let goals = default_goals();
        assert_eq!(goals.len(), 3);
        assert_eq!(goals[0].category, Category::FoodDining);
        assert_eq!(goals[0].limit, Money::from_units(1500));
    }
}
