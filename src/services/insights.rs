//! Behavioral insight service
//!
//! Asks a generative model for observations about the user's spending.
//! The model is best-effort: anything other than a usable answer degrades
//! to a single localized placeholder.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{
    BehavioralInsight, BudgetGoal, InsightKind, Language, Severity, Transaction,
};

/// Most insights kept from one response
pub const MAX_INSIGHTS: usize = 5;

/// A model that answers an insight prompt with structured JSON
pub trait InsightProvider {
    /// Send the prompt, constrained to `schema`, and return the parsed answer
    fn generate(&self, prompt: &str, schema: &Value) -> SpendwiseResult<Value>;
}

/// Result of an insight request
#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome {
    /// Too little history to say anything useful; no request was made
    Skipped { required: usize, available: usize },
    /// Validated insights from the model
    Generated(Vec<BehavioralInsight>),
    /// The model failed or answered unusably
    Fallback(BehavioralInsight),
}

impl InsightOutcome {
    pub fn insights(&self) -> Vec<BehavioralInsight> {
        match self {
            Self::Skipped { .. } => Vec::new(),
            Self::Generated(insights) => insights.clone(),
            Self::Fallback(placeholder) => vec![placeholder.clone()],
        }
    }
}

/// Service producing behavioral insights
pub struct InsightService<P: InsightProvider> {
    provider: P,
    min_transactions: usize,
}

impl<P: InsightProvider> InsightService<P> {
    pub fn new(provider: P, min_transactions: usize) -> Self {
        Self {
            provider,
            min_transactions,
        }
    }

    /// Generate insights for the given history
    pub fn generate(
        &self,
        transactions: &[Transaction],
        goals: &[BudgetGoal],
        language: Language,
    ) -> InsightOutcome {
        if transactions.len() < self.min_transactions {
            debug!(
                available = transactions.len(),
                required = self.min_transactions,
                "Skipping insight request"
            );
            return InsightOutcome::Skipped {
                required: self.min_transactions,
                available: transactions.len(),
            };
        }

        let result = build_prompt(transactions, goals, language)
            .and_then(|prompt| self.provider.generate(&prompt, &response_schema()))
            .and_then(|answer| parse_insights(&answer));

        match result {
            Ok(insights) if !insights.is_empty() => InsightOutcome::Generated(insights),
            Ok(_) => {
                warn!("Insight service returned no usable insights");
                InsightOutcome::Fallback(BehavioralInsight::placeholder(language))
            }
            Err(err) => {
                warn!(error = %err, "Insight request failed");
                InsightOutcome::Fallback(BehavioralInsight::placeholder(language))
            }
        }
    }
}

/// Build the instruction sent to the model
pub fn build_prompt(
    transactions: &[Transaction],
    goals: &[BudgetGoal],
    language: Language,
) -> SpendwiseResult<String> {
    let transactions = serde_json::to_string(transactions)?;
    let goals = serde_json::to_string(goals)?;

    Ok(format!(
        "Analyze these personal finance transactions and budget goals.\n\
         Give 3 to 5 factual, neutral behavioral insights.\n\
         Write every title and description in {language}.\n\
         \n\
         Look for:\n\
         1. Time patterns, such as spending late at night.\n\
         2. Links between mood and spending.\n\
         3. Categories running over their budget goal.\n\
         \n\
         Transactions: {transactions}\n\
         Budget goals: {goals}\n\
         \n\
         Be specific. Prefer \"Food delivery spending rises after 9pm\" over \
         \"You spend a lot on food\", and \"Shopping volume is 30% higher on days \
         marked Stressed\" over \"You shop when sad\".\n",
        language = language.prompt_name(),
    ))
}

/// JSON schema the model's answer must follow
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "severity": {
                    "type": "STRING",
                    "description": "Values: neutral, warning, positive"
                },
                "type": {
                    "type": "STRING",
                    "description": "Values: pattern, budget, psychology"
                }
            },
            "required": ["title", "description", "severity", "type"]
        }
    })
}

/// Validate a model answer into at most [`MAX_INSIGHTS`] insights
///
/// Items with missing text or unknown severity/type are dropped.
pub fn parse_insights(answer: &Value) -> SpendwiseResult<Vec<BehavioralInsight>> {
    let items = answer
        .as_array()
        .ok_or_else(|| SpendwiseError::Insight("expected a JSON array of insights".into()))?;

    let insights: Vec<_> = items
        .iter()
        .filter_map(|item| {
            let text = |key: &str| {
                item.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };

            let insight = BehavioralInsight {
                title: text("title")?,
                description: text("description")?,
                severity: Severity::parse(item.get("severity")?.as_str()?)?,
                kind: InsightKind::parse(item.get("type")?.as_str()?)?,
            };
            Some(insight)
        })
        .take(MAX_INSIGHTS)
        .collect();

    if insights.len() < items.len().min(MAX_INSIGHTS) {
        debug!(
            received = items.len(),
            kept = insights.len(),
            "Dropped invalid insights"
        );
    }

    Ok(insights)
}
