//! Spending categories and mood tags
//!
//! Both are closed enumerations. They serialize using their display labels so
//! that stored documents and AI payloads use the same vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending category of a transaction or budget goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Self::FoodDining,
        Self::Transportation,
        Self::Shopping,
        Self::Entertainment,
        Self::BillsUtilities,
        Self::Health,
        Self::Education,
        Self::Other,
    ];

    /// Human-readable label (also the serialized form)
    pub fn label(&self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsUtilities => "Bills & Utilities",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Parse a category from a label or a short alias (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "fooddining" | "food" | "dining" => Some(Self::FoodDining),
            "transportation" | "transport" => Some(Self::Transportation),
            "shopping" => Some(Self::Shopping),
            "entertainment" => Some(Self::Entertainment),
            "billsutilities" | "bills" | "utilities" => Some(Self::BillsUtilities),
            "health" => Some(Self::Health),
            "education" => Some(Self::Education),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Self-reported mood at the time of a transaction
///
/// Descriptive only; it never affects balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mood {
    Happy,
    Stressed,
    Tired,
    Bored,
    Excited,
    #[default]
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Self::Happy,
        Self::Stressed,
        Self::Tired,
        Self::Bored,
        Self::Excited,
        Self::Neutral,
    ];

    /// Parse a mood (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "stressed" => Some(Self::Stressed),
            "tired" => Some(Self::Tired),
            "bored" => Some(Self::Bored),
            "excited" => Some(Self::Excited),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Happy => "Happy",
            Self::Stressed => "Stressed",
            Self::Tired => "Tired",
            Self::Bored => "Bored",
            Self::Excited => "Excited",
            Self::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}
