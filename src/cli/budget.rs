//! Budget CLI commands
//!
//! Implements CLI commands for category budget goals.

use clap::Subcommand;

use super::transaction::{parse_category, parse_date};
use crate::display::budget::format_budget_progress;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::Money;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a spending limit for a category
    Set {
        /// Category
        category: String,
        /// Limit (e.g. "1500")
        limit: String,
        /// First day the goal applies (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day the goal applies (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
        /// Update this goal instead of the category's existing one
        #[arg(long)]
        id: Option<String>,
        /// Add another goal even if the category already has one
        #[arg(long, conflicts_with = "id")]
        new: bool,
    },
    /// Show goals with spending progress
    List,
    /// Delete a goal
    Delete {
        /// Goal ID or category
        goal: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> SpendwiseResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            from,
            until,
            id,
            new,
        } => {
            let category = parse_category(&category)?;
            let limit = Money::parse(&limit).map_err(|e| {
                SpendwiseError::Validation(format!("Invalid limit: '{}'. Error: {}", limit, e))
            })?;
            let valid_from = from.as_deref().map(parse_date).transpose()?;
            let valid_until = until.as_deref().map(parse_date).transpose()?;

            // Without --id, a category with exactly one goal has it replaced
            let existing = match (id, new) {
                (Some(id), _) => Some(
                    service
                        .find(&id)?
                        .ok_or_else(|| SpendwiseError::goal_not_found(&id))?
                        .id,
                ),
                (None, true) => None,
                (None, false) => service.find(category.label())?.map(|g| g.id),
            };

            let goal = service.save_goal(existing, category, limit, valid_from, valid_until)?;
            let verb = if existing.is_some() { "Updated" } else { "Created" };
            println!("{} budget goal {}: {}", verb, goal.id, goal);
        }

        BudgetCommands::List => {
            let progress = service.progress()?;
            print!("{}", format_budget_progress(&progress));
        }

        BudgetCommands::Delete { goal } => {
            let found = service
                .find(&goal)?
                .ok_or_else(|| SpendwiseError::goal_not_found(&goal))?;
            let deleted = service.delete_goal(found.id)?;
            println!("Deleted budget goal: {}", deleted);
        }
    }

    Ok(())
}
