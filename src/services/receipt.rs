//! Receipt scanning service
//!
//! Turns a receipt photo into a partial transaction. Every field the model
//! returns is checked against the known vocabulary and dropped if invalid.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{AccountId, Category, Money, Mood, TransactionDraft};
use crate::models::transaction::MAX_DESCRIPTION_LEN;

/// Largest image accepted for scanning
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A receipt image ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptImage {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReceiptImage {
    /// Read an image, taking the MIME type from its extension
    pub fn from_path(path: &Path) -> SpendwiseResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mime_type = match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "heic" => "image/heic",
            "heif" => "image/heif",
            _ => {
                return Err(SpendwiseError::Receipt(format!(
                    "Unsupported image type: {}",
                    path.display()
                )))
            }
        };

        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(SpendwiseError::Receipt(format!(
                "Image is empty: {}",
                path.display()
            )));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(SpendwiseError::Receipt(format!(
                "Image is larger than {} MB: {}",
                MAX_IMAGE_BYTES / (1024 * 1024),
                path.display()
            )));
        }

        Ok(Self { mime_type, bytes })
    }
}

/// A model that reads a receipt image into structured JSON
pub trait ReceiptScanner {
    fn scan(&self, image: &ReceiptImage, prompt: &str, schema: &Value) -> SpendwiseResult<Value>;
}

/// Best-effort transaction fields read from a receipt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptDraft {
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub mood: Option<Mood>,
}

impl ReceiptDraft {
    /// Validate a raw model answer; unknown or malformed fields become `None`
    pub fn from_value(value: &Value) -> SpendwiseResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SpendwiseError::Receipt("expected a JSON object".into()))?;

        let amount = object.get("amount").and_then(|v| match v {
            Value::Number(n) => n.as_f64().and_then(Money::from_f64),
            Value::String(s) => Money::parse(s).ok(),
            _ => None,
        });
        let amount = amount.filter(|a| !a.is_negative());

        let date = object
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

        let description = object
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(MAX_DESCRIPTION_LEN).collect());

        let category = object
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse);

        let mood = object.get("mood").and_then(Value::as_str).and_then(Mood::parse);

        Ok(Self {
            amount,
            date,
            description,
            category,
            mood,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill the gaps with defaults to get a transaction draft for `account_id`
    ///
    /// Fails when no amount could be read.
    pub fn to_transaction_draft(
        &self,
        account_id: AccountId,
        today: NaiveDate,
        now: NaiveTime,
    ) -> SpendwiseResult<TransactionDraft> {
        let amount = self
            .amount
            .ok_or_else(|| SpendwiseError::InvalidAmount("no amount found on the receipt".into()))?;

        Ok(TransactionDraft {
            category: self.category.unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            mood: self.mood.unwrap_or_default(),
            ..TransactionDraft::expense(account_id, amount, self.date.unwrap_or(today), now)
        })
    }
}

/// Service for receipt scanning
pub struct ReceiptService<S: ReceiptScanner> {
    scanner: S,
}

impl<S: ReceiptScanner> ReceiptService<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }

    /// Scan a receipt image into a validated partial transaction
    pub fn scan(&self, image: &ReceiptImage) -> SpendwiseResult<ReceiptDraft> {
        let answer = self.scanner.scan(image, &scan_prompt(), &receipt_schema())?;
        let draft = ReceiptDraft::from_value(&answer)?;

        if draft.is_empty() {
            warn!("Receipt scan returned no usable fields");
        } else {
            debug!(?draft, "Scanned receipt");
        }
        Ok(draft)
    }
}

/// Instruction sent along with the image
pub fn scan_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");
    let moods = Mood::ALL
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Read this receipt and extract the purchase.\n\
         amount: the total paid, as a number.\n\
         date: the purchase date as YYYY-MM-DD.\n\
         description: the merchant name or a short summary.\n\
         category: one of {categories}.\n\
         mood: one of {moods}; use Neutral when unsure.\n\
         Leave out any field you cannot read."
    )
}

/// JSON schema the scanner's answer must follow
pub fn receipt_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "amount": { "type": "NUMBER" },
            "date": { "type": "STRING", "description": "YYYY-MM-DD" },
            "description": { "type": "STRING" },
            "category": { "type": "STRING" },
            "mood": { "type": "STRING" }
        }
    })
}
