//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::diff::generate_diff;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Documents whose changes are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Account,
    Transaction,
    BudgetGoal,
    Profile,
    Settings,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::BudgetGoal => write!(f, "BudgetGoal"),
            EntityType::Profile => write!(f, "Profile"),
            EntityType::Settings => write!(f, "Settings"),
        }
    }
}

/// A single line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label (account name, transaction summary)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Snapshot before the change (updates and deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// Snapshot after the change (creates and updates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::new(
            Operation::Create,
            entity_type,
            entity_id.into(),
            entity_name,
            None,
            serde_json::to_value(entity).ok(),
        )
    }

    /// Update entry; the diff summary is derived from the two snapshots
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::new(
            Operation::Update,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
        )
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::new(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(entity).ok(),
            None,
        )
    }

    /// One or two lines suitable for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_entry_derives_diff() {
        let before = json!({"name": "Visa", "balance": -20000});
        let after = json!({"name": "Visa", "balance": -10000});

        let entry = AuditEntry::update(
            EntityType::Account,
            "acc-12345678",
            Some("Visa".into()),
            &before,
            &after,
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("balance: -20000 -> -10000")
        );
    }

    #[test]
    fn test_create_and_delete_have_one_snapshot() {
        let data = json!({"amount": 1250});
        let created = AuditEntry::create(EntityType::Transaction, "txn-1", None, &data);
        assert!(created.before.is_none() && created.after.is_some());
        assert!(created.diff_summary.is_none());

        let deleted = AuditEntry::delete(EntityType::Transaction, "txn-1", None, &data);
        assert!(deleted.before.is_some() && deleted.after.is_none());
    }

    #[test]
    fn test_entity_type_serializes_snake_case() {
        let entry = AuditEntry::create(EntityType::BudgetGoal, "goal-1", None, &json!({}));
        let line = serde_json::to_value(&entry).unwrap();
        assert_eq!(line["entity_type"], "budget_goal");
        assert_eq!(line["operation"], "create");
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Settings,
            "preferences",
            None,
            &json!({"currencyCode": "SAR"}),
            &json!({"currencyCode": "USD"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Settings preferences"));
        assert!(formatted.contains("Changes: currencyCode: \"SAR\" -> \"USD\""));
    }
}
