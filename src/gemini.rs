//! Gemini `generateContent` client with search grounding.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::Source;
use crate::config::Config;
use crate::error::{AuditError, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One model reply: the raw text plus any usable grounding citations.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub sources: Vec<Source>,
}

/// The single seam between the audit pipeline and the outside world.
/// Tests substitute a mock; production uses [`GeminiBackend`].
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<ModelReply>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    tools: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// Keep only citations that carry both a title and a URI, in model order.
pub fn map_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            match (&web.title, &web.uri) {
                (Some(title), Some(uri)) => Some(Source {
                    title: title.clone(),
                    uri: uri.clone(),
                }),
                _ => None,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.resolved_api_key(), config.resolved_model())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<ModelReply> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AuditError::MissingCredential)?;

        let request = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            // Search grounding so public repositories get a real answer
            tools: vec![json!({ "googleSearch": {} })],
        };

        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, api_key);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Transport {
                message: format!("Gemini API error {}: {}", status, body.trim()),
            });
        }

        let decoded: GenerateResponse = response.json().await?;

        let Some(candidate) = decoded.candidates.into_iter().next() else {
            return Ok(ModelReply {
                text: String::new(),
                sources: Vec::new(),
            });
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let sources = candidate
            .grounding_metadata
            .map(|metadata| map_sources(&metadata.grounding_chunks))
            .unwrap_or_default();

        Ok(ModelReply { text, sources })
    }
}
