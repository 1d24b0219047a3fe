//! Generator client for new combinations.
//!
//! A [`Generator`] turns two concept names into a candidate element. The
//! production implementation, [`GeminiGenerator`], asks Gemini for a JSON
//! object with a `name` and an `emoji` and does nothing beyond transport,
//! schema enforcement, and translating failures into [`GenerateError`].
//! It never retries.

use async_trait::async_trait;
use gemini::{FinishReason, Gemini, Request};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LANGUAGE: &str = "Turkish";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Why a generation attempt produced nothing.
///
/// Callers of the resolver never see these; they exist for diagnostics.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid generator payload: {0}")]
    Validation(String),
}

/// Coarse failure category used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Validation,
}

impl GenerateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerateError::Transport(_) | GenerateError::Timeout(_) => FailureKind::Transport,
            GenerateError::Validation(_) => FailureKind::Validation,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Validation => f.write_str("validation"),
        }
    }
}

impl From<gemini::Error> for GenerateError {
    fn from(e: gemini::Error) -> Self {
        match e {
            gemini::Error::Parse(msg) => GenerateError::Validation(format!("malformed response: {msg}")),
            other => GenerateError::Transport(other.to_string()),
        }
    }
}

/// Unvalidated output of a generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub emoji: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }
}

/// Something that can invent a new element from two existing ones.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, first: &str, second: &str) -> Result<Candidate, GenerateError>;
}

/// Configuration for [`GeminiGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The model to use (defaults to the client's model).
    pub model: Option<String>,

    /// Natural language the new element is named in.
    pub language: String,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Maximum tokens for the response. Unset by default: on thinking models
    /// the thinking budget counts against this cap.
    pub max_output_tokens: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            language: DEFAULT_LANGUAGE.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Generator backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Gemini,
    config: GeneratorConfig,
}

impl GeminiGenerator {
    pub fn new(client: Gemini, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    /// Create from the environment (`GEMINI_API_KEY` or `API_KEY`).
    pub fn from_env(config: GeneratorConfig) -> Result<Self, gemini::Error> {
        Ok(Self::new(Gemini::from_env()?, config))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_request(&self, first: &str, second: &str) -> Request {
        let mut request = Request::new(build_prompt(first, second, &self.config.language))
            .with_json_schema(response_schema(&self.config.language));
        if let Some(max_output_tokens) = self.config.max_output_tokens {
            request = request.with_max_output_tokens(max_output_tokens);
        }
        if let Some(model) = &self.config.model {
            request = request.with_model(model);
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, first: &str, second: &str) -> Result<Candidate, GenerateError> {
        let response = self
            .client
            .generate(self.build_request(first, second))
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "Gemini request failed"))?;

        if let Some(reason) = stop_diagnostic(response.finish_reason) {
            tracing::warn!(
                first,
                second,
                model = %response.model,
                finish_reason = ?response.finish_reason,
                "{reason}"
            );
        }

        parse_candidate(&response.text())
    }
}

/// Why a finish reason makes an unusable payload likely.
fn stop_diagnostic(reason: Option<FinishReason>) -> Option<&'static str> {
    match reason? {
        FinishReason::MaxTokens => Some("response truncated at the output token limit"),
        FinishReason::Safety => Some("response blocked by safety filters"),
        FinishReason::Stop | FinishReason::Other => None,
    }
}

fn build_prompt(first: &str, second: &str, language: &str) -> String {
    format!(
        r#"Combine the concepts of "{first}" and "{second}" to create a new single object, concept, or entity.
Return the result in {language}.
Examples:
Fire + Water = Steam (Buhar)
Earth + Water = Mud (Çamur)
Wind + Earth = Dust (Toz)

Be creative, funny, or logical. Avoid creating sentences, just a noun or short phrase.
Provide a matching emoji."#
    )
}

fn response_schema(language: &str) -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": format!("The resulting name in {language}"),
            },
            "emoji": {
                "type": "STRING",
                "description": "A single emoji representing the result",
            },
        },
        "required": ["name", "emoji"],
    })
}

/// Parse the structured payload returned by the service.
///
/// Missing fields and malformed JSON are validation failures. Field contents
/// are returned untouched; emptiness is checked by the resolver.
pub fn parse_candidate(text: &str) -> Result<Candidate, GenerateError> {
    let json_str = extract_json(text);
    if json_str.is_empty() {
        return Err(GenerateError::Validation("empty response body".to_string()));
    }

    serde_json::from_str(json_str).map_err(|e| GenerateError::Validation(format!("{e}: {json_str}")))
}

/// Extract JSON from a response that might have markdown code blocks.
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let content_start = start + 3;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    text
}
