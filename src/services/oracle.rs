use crate::config::OracleSettings;
use crate::core::FacetSchema;
use crate::models::OraclePayload;
use crate::services::extract::extract_json_block;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const SYSTEM_PROMPT: &str =
    "You map neighborhoods and cities to their closest vibe matches. Reply ONLY in JSON.";

const REPAIR_PROMPT: &str = "That reply was not valid JSON. Return the same answer again as a \
     single JSON object with no commentary and no code fences.";

/// Errors that can occur when talking to the oracle
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No usable JSON object found in oracle reply after {0} attempt(s)")]
    Unparsable(u32),
}

/// What the ranking core receives from the oracle boundary
#[derive(Debug, Clone, PartialEq)]
pub enum OracleOutcome {
    Parsed(OraclePayload),
    /// The oracle failed; callers answer with the fixed fallback results
    Fallback { reason: String },
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }

    fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant", content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

/// Client for an OpenAI-compatible chat completions API
///
/// Turns a source place and a target scope into an untrusted
/// `OraclePayload`: a profile, a source facet vector and candidate places.
pub struct OracleClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    candidate_count: usize,
    repair_attempts: u32,
    schema: Arc<FacetSchema>,
    client: Client,
}

impl OracleClient {
    pub fn new(settings: &OracleSettings, schema: Arc<FacetSchema>) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            candidate_count: settings.candidate_count,
            repair_attempts: settings.repair_attempts,
            schema,
            client,
        })
    }

    /// Ask the oracle, degrading every failure into `OracleOutcome::Fallback`
    pub async fn consult(&self, source_place: &str, target_scope: &str) -> OracleOutcome {
        match self.fetch_payload(source_place, target_scope).await {
            Ok(payload) => OracleOutcome::Parsed(payload),
            Err(e) => {
                tracing::warn!(
                    "Oracle failed for {:?} in {:?}, using fallback: {}",
                    source_place,
                    target_scope,
                    e
                );
                OracleOutcome::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// One completion plus up to `repair_attempts` repair passes
    pub async fn fetch_payload(
        &self,
        source_place: &str,
        target_scope: &str,
    ) -> Result<OraclePayload, OracleError> {
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(
                &self.schema,
                source_place,
                target_scope,
                self.candidate_count,
            )),
        ];

        let mut reply = self.complete(&messages).await?;
        let mut attempts = 1;

        loop {
            if let Some(value) = extract_json_block(&reply) {
                if OraclePayload::has_known_sections(&value) {
                    return Ok(OraclePayload::from_value(&value));
                }
                tracing::debug!("Oracle reply JSON has no candidates or source vector");
            }

            if attempts > self.repair_attempts {
                return Err(OracleError::Unparsable(attempts));
            }

            tracing::debug!("Oracle reply was not usable JSON, requesting repair (attempt {})", attempts);

            messages.push(ChatMessage::assistant(reply));
            messages.push(ChatMessage::user(REPAIR_PROMPT));
            reply = self.complete(&messages).await?;
            attempts += 1;
        }
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OracleError::ApiError(format!(
                "Chat completion failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        json.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                OracleError::InvalidResponse("Missing choices[0].message.content".into())
            })
    }
}

/// User prompt describing the facet schema and the expected reply shape
pub fn build_prompt(
    schema: &FacetSchema,
    source_place: &str,
    target_scope: &str,
    candidate_count: usize,
) -> String {
    let facet_lines: Vec<String> = schema
        .facets()
        .iter()
        .map(|facet| format!("- {}: {}", facet.name, facet.description))
        .collect();

    let example_vector: Vec<String> = schema
        .names()
        .map(|name| format!("\"{}\": 0.0", name))
        .collect();

    format!(
        r#"Rate places on these facets, each a number from 0 to 1:
{facets}

Source: "{source}"
Target scope: "{scope}"

Describe the source place, then propose {count} neighborhoods or cities inside the target scope that share its vibe.
Return one JSON object shaped like:
{{
  "profile": {{"label": "...", "description": "one line", "features": ["..."], "tags": ["..."]}},
  "source_vector": {{{vector}}},
  "candidates": [
    {{"name": "...", "locale": "city, country", "why": "one sentence, at most 200 characters", "tags": ["three", "short", "keywords"], "vector": {{{vector}}}}}
  ]
}}"#,
        facets = facet_lines.join("\n"),
        source = source_place,
        scope = target_scope,
        count = candidate_count,
        vector = example_vector.join(", "),
    )
}
