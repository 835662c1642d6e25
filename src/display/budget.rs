//! Budget goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::format_bar;
use crate::models::BudgetGoal;
use crate::services::budget::{BudgetProgress, BudgetStatus};

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Validity window as text; open ends are shown as `...`
pub fn format_window(goal: &BudgetGoal) -> String {
    match (goal.valid_from, goal.valid_until) {
        (None, None) => "always".to_string(),
        (from, until) => format!(
            "{} .. {}",
            from.map(|d| d.to_string()).unwrap_or_else(|| "...".into()),
            until.map(|d| d.to_string()).unwrap_or_else(|| "...".into())
        ),
    }
}

fn status_marker(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "",
        BudgetStatus::Warning => "!",
        BudgetStatus::Critical => "!!",
        BudgetStatus::Exceeded => "!!!",
    }
}

/// Format budget progress as a table
pub fn format_budget_progress(progress: &[BudgetProgress]) -> String {
    if progress.is_empty() {
        return "No budget goals. Use 'spendwise budget set' to add one.\n".to_string();
    }

    let rows: Vec<ProgressRow> = progress
        .iter()
        .map(|p| ProgressRow {
            id: p.goal.id.to_string(),
            category: p.goal.category.to_string(),
            window: format_window(&p.goal),
            spent: p.spent.to_string(),
            limit: p.goal.limit.to_string(),
            remaining: p.remaining.to_string(),
            progress: format!(
                "{} {:>3}%",
                format_bar(f64::from(p.percent), 100.0, 10),
                p.percent
            ),
            status: format!("{} {}", p.status, status_marker(p.status))
                .trim_end()
                .to_string(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_format_window() {
        let goal = BudgetGoal::new(Category::Health, Money::from_units(10));
        assert_eq!(format_window(&goal), "always");

        let goal = goal.with_window(NaiveDate::from_ymd_opt(2025, 1, 1), None);
        assert_eq!(format_window(&goal), "2025-01-01 .. ...");
    }

    #[test]
    fn test_format_progress() {
        let goal = BudgetGoal::new(Category::Shopping, Money::from_units(100));
        let progress = BudgetProgress::compute(&goal, &[]).unwrap();
        let output = format_budget_progress(&[progress]);
        assert!(output.contains("Shopping"));
        assert!(output.contains("on track"));
        assert!(output.contains("0%"));
    }

    #[test]
    fn test_format_empty() {
        assert!(format_budget_progress(&[]).contains("No budget goals"));
    }
}
