//! Budget goal repository for JSON storage
//!
//! Manages loading and saving budget goals to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{BudgetGoal, BudgetGoalId, Category};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    goals: Vec<BudgetGoal>,
}

/// Repository for budget goal persistence
pub struct BudgetGoalRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetGoalId, BudgetGoal>>,
}

impl BudgetGoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load goals from disk
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for goal in file_data.goals {
            data.insert(goal.id, goal);
        }

        Ok(())
    }

    /// Save goals to disk
    pub fn save(&self) -> Result<(), SpendwiseError> {
        let goals = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { goals })
    }

    pub fn get(&self, id: BudgetGoalId) -> Result<Option<BudgetGoal>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All goals, ordered by category then creation time
    pub fn get_all(&self) -> Result<Vec<BudgetGoal>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut goals: Vec<_> = data.values().cloned().collect();
        goals.sort_by(|a, b| {
            a.category
                .label()
                .cmp(b.category.label())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(goals)
    }

    /// Goals for one category
    pub fn get_by_category(&self, category: Category) -> Result<Vec<BudgetGoal>, SpendwiseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|g| g.category == category)
            .collect())
    }

    pub fn upsert(&self, goal: BudgetGoal) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(goal.id, goal);
        Ok(())
    }

    pub fn delete(&self, id: BudgetGoalId) -> Result<bool, SpendwiseError> {
        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetGoalRepository::new(path.clone());

        let goal = BudgetGoal::new(Category::Health, Money::from_units(300));
        let id = goal.id;
        repo.upsert(goal).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetGoalRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().limit, Money::from_units(300));
    }

    #[test]
    fn test_get_by_category() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetGoalRepository::new(temp_dir.path().join("budgets.json"));

        repo.upsert(BudgetGoal::new(Category::Shopping, Money::from_units(1)))
            .unwrap();
        repo.upsert(BudgetGoal::new(Category::Health, Money::from_units(2)))
            .unwrap();

        assert_eq!(repo.get_by_category(Category::Shopping).unwrap().len(), 1);
        assert!(repo.get_by_category(Category::Other).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetGoalRepository::new(temp_dir.path().join("budgets.json"));
        let goal = BudgetGoal::new(Category::Education, Money::from_units(5));
        let id = goal.id;
        repo.upsert(goal).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
