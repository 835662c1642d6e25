//! CLI commands backed by the generative API: insights and receipt scanning

use std::path::Path;

use crate::config::Settings;
use crate::display::report::format_insights;
use crate::display::transaction::format_transaction_details;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::gemini::GeminiClient;
use crate::models::BehavioralInsight;
use crate::services::{
    AccountService, InsightOutcome, InsightService, ReceiptImage, ReceiptService,
    TransactionService,
};
use crate::storage::Storage;

use super::transaction::{account_names, now_local};

/// Handle the insights command
pub fn handle_insights_command(storage: &Storage, settings: &Settings) -> SpendwiseResult<()> {
    let transactions = storage.transactions.get_all()?;
    let goals = storage.budgets.get_all()?;
    let language = storage.profile.settings()?.language;

    // Not enough history means no request, so no key is needed either
    if transactions.len() < settings.insights.min_transactions {
        println!(
            "Add at least {} transactions to get insights ({} so far).",
            settings.insights.min_transactions,
            transactions.len()
        );
        return Ok(());
    }

    let outcome = match GeminiClient::from_settings(&settings.insights) {
        Ok(client) => InsightService::new(client, settings.insights.min_transactions)
            .generate(&transactions, &goals, language),
        Err(err) => {
            tracing::warn!(error = %err, "Insight client unavailable");
            InsightOutcome::Fallback(BehavioralInsight::placeholder(language))
        }
    };

    print!("{}", format_insights(&outcome.insights()));
    Ok(())
}

/// Handle the receipt command
pub fn handle_receipt_command(
    storage: &Storage,
    settings: &Settings,
    image: &Path,
    account: Option<&str>,
    save: bool,
) -> SpendwiseResult<()> {
    let image = ReceiptImage::from_path(image)?;
    let client = GeminiClient::from_settings(&settings.insights)?;
    let draft = ReceiptService::new(client).scan(&image)?;

    println!("Scanned receipt:");
    let show = |label: &str, value: Option<String>| {
        println!(
            "  {:<12} {}",
            label,
            value.unwrap_or_else(|| "(not found)".to_string())
        );
    };
    show("Amount:", draft.amount.map(|a| a.to_string()));
    show("Date:", draft.date.map(|d| d.to_string()));
    show("Description:", draft.description.clone());
    show("Category:", draft.category.map(|c| c.to_string()));
    show("Mood:", draft.mood.map(|m| m.to_string()));

    if !save {
        return Ok(());
    }

    let account_service = AccountService::new(storage);
    let account = match account {
        Some(account) => account_service.require(account)?,
        None => account_service.list()?.into_iter().next().ok_or_else(|| {
            SpendwiseError::Validation(
                "No accounts yet; create one with 'spendwise account create'".into(),
            )
        })?,
    };

    let (today, now) = now_local();
    let txn = TransactionService::new(storage)
        .create(draft.to_transaction_draft(account.id, today, now)?)?;
    println!();
    println!("Saved transaction:");
    print!("{}", format_transaction_details(&txn, &account_names(storage)?));
    Ok(())
}
