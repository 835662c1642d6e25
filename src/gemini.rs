//! Client for the hosted generative API
//!
//! One blocking `generateContent` call per request, with the answer
//! constrained to JSON by a response schema. Used both for behavioral
//! insights and for receipt scanning.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::InsightSettings;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::services::{InsightProvider, ReceiptImage, ReceiptScanner};

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Blocking client for `models/{model}:generateContent`
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> SpendwiseResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            http,
        })
    }

    /// Build a client from settings, reading the key from the environment
    pub fn from_settings(settings: &InsightSettings) -> SpendwiseResult<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            SpendwiseError::Config(format!(
                "No API key found; set the {} environment variable",
                settings.api_key_env
            ))
        })?;

        Self::new(
            &settings.api_base,
            &settings.model,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Endpoint for the configured model
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn generate_json(&self, body: &Value) -> SpendwiseResult<Value> {
        debug!(model = %self.model, "Sending generateContent request");

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?;

        let status = res.status();
        let text = res.text()?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpendwiseError::Http(format!("{}: {}", status, message)));
        }

        parse_response(&text)
    }
}

/// Request body with a text prompt, optional inline image and response schema
pub fn request_body(prompt: &str, image: Option<&ReceiptImage>, schema: &Value) -> Value {
    let mut parts = vec![json!({ "text": prompt })];
    if let Some(image) = image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": STANDARD.encode(&image.bytes),
            }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        }
    })
}

/// Extract and parse the JSON text of the first candidate
pub fn parse_response(body: &str) -> SpendwiseResult<Value> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| SpendwiseError::Insight("response contained no text".into()))?;

    serde_json::from_str(text.trim())
        .map_err(|e| SpendwiseError::Insight(format!("response was not valid JSON: {}", e)))
}

impl InsightProvider for GeminiClient {
    fn generate(&self, prompt: &str, schema: &Value) -> SpendwiseResult<Value> {
        self.generate_json(&request_body(prompt, None, schema))
    }
}

impl ReceiptScanner for GeminiClient {
    fn scan(&self, image: &ReceiptImage, prompt: &str, schema: &Value) -> SpendwiseResult<Value> {
        self.generate_json(&request_body(prompt, Some(image), schema))
            .map_err(|e| match e {
                SpendwiseError::Insight(msg) => SpendwiseError::Receipt(msg),
                other => other,
            })
    }
}
