//! Behavioral insight model
//!
//! Structured observations produced by the generative insight service.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::Language;

/// How an insight should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Warning,
    Positive,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Some(Self::Neutral),
            "warning" => Some(Self::Warning),
            "positive" => Some(Self::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Warning => write!(f, "warning"),
            Self::Positive => write!(f, "positive"),
        }
    }
}

/// What an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Time-based spending patterns
    Pattern,
    /// Comparison against budget goals
    Budget,
    /// Correlation between mood and spending
    Psychology,
}

impl InsightKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pattern" => Some(Self::Pattern),
            "budget" => Some(Self::Budget),
            "psychology" => Some(Self::Psychology),
            _ => None,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => write!(f, "pattern"),
            Self::Budget => write!(f, "budget"),
            Self::Psychology => write!(f, "psychology"),
        }
    }
}

/// A single behavioral insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralInsight {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: InsightKind,
}

impl BehavioralInsight {
    /// Shown when the insight service cannot be reached
    pub fn placeholder(language: Language) -> Self {
        let (title, description) = match language {
            Language::En => (
                "Data Analysis Paused",
                "We're having trouble reaching the AI. Try again in a moment.",
            ),
            Language::Ar => (
                "تحليل البيانات متوقف مؤقتاً",
                "نواجه مشكلة في الوصول للذكاء الاصطناعي. حاول مرة أخرى.",
            ),
        };

        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Neutral,
            kind: InsightKind::Pattern,
        }
    }
}
