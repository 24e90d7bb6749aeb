//! Generative-text client
//!
//! `POST models/{model}:generateContent?key=...` with a single text prompt,
//! `GET models?key=...` for connectivity checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::DisplayProduct;

use crate::error::{GenerationError, classify_error};
use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite-001";

/// Writes a description for one product
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, product: &DisplayProduct) -> Result<String, GenerationError>;
}

// ========== Wire types ==========

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, trimmed, if non-empty
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

// ========== Client ==========

/// Client for the generative-text API
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    http: HttpClient,
    model: String,
}

impl GenerativeClient {
    /// Requires `config.api_key`
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ClientError::MissingApiKey);
        }

        Ok(Self {
            http: config.build_http_client()?,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// List model identifiers visible to this key
    pub async fn list_models(&self) -> ClientResult<Vec<String>> {
        let list: ModelList = self.http.get("models").await?;
        Ok(list.models.into_iter().map(|m| m.name).collect())
    }

    /// Send one prompt and return the generated text
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        let path = format!("models/{}:generateContent", self.model);

        let response = self.http.post_raw(&path, &request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Other(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let err = classify_error(status, &body);
            tracing::debug!(%status, error = %err, "Generation request failed");
            return Err(err);
        }

        parse_generated_text(&body)
    }
}

fn parse_generated_text(body: &str) -> Result<String, GenerationError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Other(format!("Invalid generation response: {e}")))?;

    parsed
        .first_text()
        .ok_or_else(|| GenerationError::Other("Generation returned no text".to_string()))
}

/// Fixed prompt asking for a short product description
pub fn description_prompt(product: &DisplayProduct) -> String {
    format!(
        "Write a short, elegant product description (max 2 sentences) for a high-end cosmetic product. \
         Do not use hashtags and do not repeat the product name.\n\
         Product Name: {}\nCategory: {}\nSubtitle: {}\nBenefits: {}",
        product.name,
        product.category,
        product.subtitle,
        product.benefits.join(", "),
    )
}

#[async_trait]
impl DescriptionGenerator for GenerativeClient {
    async fn generate(&self, product: &DisplayProduct) -> Result<String, GenerationError> {
        self.generate_text(&description_prompt(product)).await
    }
}
