use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::Config,
    errors::{AdvisorError, LedgerError},
    ledger::LedgerStore,
    storage::StorageBackend,
};

use super::context::AdvisoryContext;

/// Storage key holding the advisory credential.
pub const API_KEY_STORAGE_KEY: &str = "api_key";

/// Client for the remote text-generation endpoint.
///
/// Stateless beyond the stored credential and endpoint parameters. Each
/// generation method performs exactly one HTTP exchange: no retry, no
/// backoff, no internal timeout. Callers that fire concurrent requests must
/// serialize or rate-limit them themselves.
pub struct AdvisorClient {
    http: reqwest::Client,
    storage: Arc<dyn StorageBackend>,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl AdvisorClient {
    /// Builds a client, picking up a previously persisted credential. A
    /// credential read failure counts as "no credential" rather than an
    /// error: the feature degrades to disabled.
    pub fn new(storage: Arc<dyn StorageBackend>, config: &Config) -> Self {
        let api_key = match storage.read(API_KEY_STORAGE_KEY) {
            Ok(value) => value.filter(|key| !key.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read stored API key");
                None
            }
        };
        Self {
            http: reqwest::Client::new(),
            storage,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Persists the credential alongside the ledger collections. An empty
    /// key disables the advisory feature.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> Result<(), LedgerError> {
        let key = key.into();
        self.storage.write(API_KEY_STORAGE_KEY, &key)?;
        self.api_key = Some(key).filter(|key| !key.trim().is_empty());
        Ok(())
    }

    /// Assembles the bounded snapshot the generation methods embed.
    pub fn build_context(&self, store: &LedgerStore) -> AdvisoryContext {
        AdvisoryContext::from_store(store)
    }

    /// One short, actionable tip (at most two sentences).
    pub async fn generate_tip(&self, store: &LedgerStore) -> Result<String, AdvisorError> {
        let context = self.context_json(store)?;
        let prompt = format!(
            "Act as a financial advisor. Based on the following user financial data (JSON), \
             provide a SINGLE, short, actionable, and encouraging financial tip (max 2 sentences).\n\
             Focus on saving more or spending wisely based on their recent behavior.\n\
             User Data:\n{context}"
        );
        self.call_model(&prompt).await
    }

    /// A four-section monthly report in Markdown.
    pub async fn generate_report(&self, store: &LedgerStore) -> Result<String, AdvisorError> {
        let context = self.context_json(store)?;
        let prompt = format!(
            "Act as a financial advisor. Analyze the following user financial data (JSON) and \
             provide a comprehensive monthly report.\n\
             The report should include:\n\
             1. **Summary**: Brief overview of financial health this month.\n\
             2. **Spending Analysis**: Where is the money going? Any alarming categories?\n\
             3. **Savings Review**: Progress on goals and suggestions.\n\
             4. **Recommendations**: 3 concrete steps to improve next month.\n\n\
             Format the output in clean Markdown. Use bolding and lists.\n\
             User Data:\n{context}"
        );
        self.call_model(&prompt).await
    }

    /// A step-by-step plan towards a savings target by a given date.
    pub async fn generate_plan(
        &self,
        store: &LedgerStore,
        target_amount: f64,
        target_date: NaiveDate,
    ) -> Result<String, AdvisorError> {
        let context = self.context_json(store)?;
        let prompt = format!(
            "Act as a financial strategist. The user wants to achieve a monthly income/savings \
             goal of {target_amount} by {target_date}.\n\n\
             Current Context:\n{context}\n\n\
             Provide a detailed, step-by-step plan to achieve this goal responsibly.\n\
             Include:\n\
             1. **Feasibility Check**: Is this realistic based on current income/expenses?\n\
             2. **Expense Optimization**: Where can they cut costs immediately to free up cash?\n\
             3. **Income Generation Ideas**: General suggestions (freelancing, upskilling) if \
             current income isn't enough.\n\
             4. **Timeline**: Milestones to hit by the target date.\n\n\
             Format the output in clean Markdown. Be encouraging but realistic."
        );
        self.call_model(&prompt).await
    }

    fn context_json(&self, store: &LedgerStore) -> Result<String, AdvisorError> {
        Ok(AdvisoryContext::from_store(store).to_json()?)
    }

    /// Single request-response exchange with the generation endpoint.
    async fn call_model(&self, prompt: &str) -> Result<String, AdvisorError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AdvisorError::MissingApiKey);
        };
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        );
        let request = GenerateRequest::from_prompt(prompt);

        debug!(model = %self.model, "requesting advisory completion");
        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| "Advisory request failed".to_string());
            return Err(AdvisorError::Api(message));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|_| AdvisorError::MalformedResponse)?;
        body.into_text().ok_or(AdvisorError::MalformedResponse)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Extracts `candidates[0].content.parts[0].text`; `None` on any
    /// structural deviation.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_is_extracted() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Save a little every week."}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.into_text().as_deref(),
            Some("Save a little every week.")
        );
    }

    #[test]
    fn structural_deviations_yield_none() {
        let no_candidates: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(no_candidates.into_text().is_none());

        let empty_parts: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(empty_parts.into_text().is_none());

        let missing_content: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(missing_content.into_text().is_none());
    }

    #[test]
    fn request_wraps_prompt_in_contents_parts() {
        let request = GenerateRequest::from_prompt("hello");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error":{"message":"quota exceeded"}}"#).unwrap();
        assert_eq!(
            body.error.and_then(|e| e.message).as_deref(),
            Some("quota exceeded")
        );

        let empty: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(empty.error.is_none());
    }
}
