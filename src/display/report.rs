//! Report formatting utilities for terminal output
//!
//! Dashboard figures and behavioral insights, plus small shared helpers.

use crate::models::{BehavioralInsight, Currency, Severity};
use crate::reports::DashboardSummary;

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format the dashboard headline figures
pub fn format_dashboard(summary: &DashboardSummary, currency: Currency) -> String {
    let mut output = String::new();
    output.push_str("Dashboard\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!(
        "  Total spent:    {}\n",
        summary.total_spent.format_with_symbol(currency.symbol)
    ));
    output.push_str(&format!(
        "  Total balance:  {}\n",
        summary.total_balance.format_with_symbol(currency.symbol)
    ));
    output.push_str(&format!("  Accounts:       {}\n", summary.account_count));
    output.push_str(&format!("  Transactions:   {}\n", summary.transaction_count));
    output.push_str(&format!("  Budget goals:   {}\n", summary.goal_count));
    output
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Neutral => "•",
        Severity::Warning => "⚠",
        Severity::Positive => "✓",
    }
}

/// Format behavioral insights as a list of cards
pub fn format_insights(insights: &[BehavioralInsight]) -> String {
    if insights.is_empty() {
        return "No insights yet.\n".to_string();
    }

    let mut output = String::new();
    for insight in insights {
        output.push_str(&format!(
            "{} {} [{}]\n",
            severity_icon(insight.severity),
            insight.title,
            insight.kind
        ));
        output.push_str(&format!("  {}\n\n", insight.description));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InsightKind, Language, Money};

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 4), "██░░");
        assert_eq!(format_bar(200.0, 100.0, 4), "████");
        assert_eq!(format_bar(0.0, 100.0, 2), "░░");
    }

    #[test]
    fn test_format_dashboard() {
        let summary = DashboardSummary {
            total_spent: Money::from_units(40),
            total_balance: Money::from_units(260),
            account_count: 2,
            transaction_count: 2,
            goal_count: 3,
        };
        let output = format_dashboard(&summary, Currency::by_code("EUR").unwrap());
        assert!(output.contains("€ 40.00"));
        assert!(output.contains("€ 260.00"));
    }

    #[test]
    fn test_format_insights() {
        let insights = vec![
            BehavioralInsight {
                title: "Over budget".into(),
                description: "Shopping passed its goal".into(),
                severity: Severity::Warning,
                kind: InsightKind::Budget,
            },
            BehavioralInsight::placeholder(Language::En),
        ];
        let output = format_insights(&insights);
        assert!(output.contains("⚠ Over budget [budget]"));
        assert!(output.contains("Data Analysis Paused"));
        assert!(format_insights(&[]).contains("No insights"));
    }
}
