//! Natural-language formula generation
//!
//! Wraps a remote text-generation service that turns a plain-language
//! description into formula source. The output is untrusted: it is fed
//! through the same typesetting pipeline as hand-typed source and may well
//! fail there with a syntax diagnostic.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str = r"You are a specialized LaTeX math assistant.
Your sole purpose is to convert natural language math descriptions into standard LaTeX math code.
Rules:
1. Return ONLY the raw LaTeX string. Do not wrap it in markdown code blocks, do not add explanations.
2. Do not use '$' delimiters.
3. If the request is complex, try to format it cleanly.
4. Example:
   User: 'integral of x squared from 0 to infinity'
   Output: \int_{0}^{\infty} x^2 \, dx";

/// Errors from the formula-generation collaborator
///
/// All of these are recoverable: the caller reports a short message and
/// leaves the current formula untouched.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("no API key configured (set {0})")]
    MissingKey(&'static str),
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("generation service returned an unusable response: {0}")]
    Malformed(String),
}

/// A collaborator that produces formula source from a description
#[async_trait]
pub trait FormulaGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Environment variable holding the generation API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Formula generator backed by the Gemini generateContent API
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a generator from the environment
    pub fn from_env() -> Result<Self, GenerateError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(GenerateError::MissingKey(API_KEY_VAR)),
        }
    }

    /// Point at a different endpoint (used against a local stub in tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Select a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl FormulaGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model
        );
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.1 }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response.json().await?;
        let source = extract_text(payload)?;
        info!(
            target: "mathsmith::generate",
            op = "generate",
            result = "ok",
            source_bytes = source.len(),
            "Formula generated from description"
        );
        Ok(source)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(payload: GenerateResponse) -> Result<String, GenerateError> {
    let text = payload
        .candidates
        .and_then(|mut c| c.drain(..).next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|mut p| p.drain(..).next())
        .and_then(|p| p.text)
        .ok_or_else(|| GenerateError::Malformed("no candidate text".to_string()))?;
    Ok(strip_fences(&text))
}

/// Remove markdown code fences the model sometimes adds despite instructions
fn strip_fences(text: &str) -> String {
    let mut cleaned = text.trim();
    for prefix in ["```latex", "```tex", "```"] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest;
            break;
        }
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim().to_string()
}
