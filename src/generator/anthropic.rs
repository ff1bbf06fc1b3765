//! Anthropic generator implementation using the `/v1/messages` API.

use serde::{Deserialize, Serialize};

use super::{check_http_response, extract_source, Generator, GeneratorError};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// System prompt steering the model toward the source shape the rest of the
/// pipeline expects: one exported component, static imports, no prose.
const SYSTEM_PROMPT: &str = "\
You write React component source files in TypeScript.

Rules:
- Output exactly one file containing one exported component.
- Use only static imports from 'react', 'react-dom', project-relative \
paths, or the '@/' alias.
- Never use eval, Function constructors, dynamic import(), require, \
fetch, XMLHttpRequest, WebSocket, process, globalThis, innerHTML, or \
dangerouslySetInnerHTML.
- Give list items stable key attributes and keep interactive elements \
keyboard-accessible.
- Respond with the file content only, optionally in a single fenced \
code block. No explanations.";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Anthropic messages API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<AnthropicMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// System prompt.
    pub system: String,
}

/// A message in Anthropic format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Anthropic API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// Content blocks in the response.
    pub content: Vec<AnthropicContentBlock>,
}

/// A content block in the Anthropic response.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
    /// Any non-text block; ignored.
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Component source generator backed by the Anthropic messages API.
#[derive(Debug, Clone)]
pub struct AnthropicGenerator {
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicGenerator {
    /// Create a new Anthropic generator instance.
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build an Anthropic API request for an instruction.
#[doc(hidden)]
pub fn build_request(model: &str, instruction: &str) -> AnthropicRequest {
    AnthropicRequest {
        model: model.to_owned(),
        messages: vec![AnthropicMessage {
            role: "user".to_owned(),
            content: instruction.to_owned(),
        }],
        max_tokens: DEFAULT_MAX_TOKENS,
        system: SYSTEM_PROMPT.to_owned(),
    }
}

/// Parse an Anthropic API response into component source text.
///
/// # Errors
///
/// Returns `GeneratorError::Parse` if the response cannot be deserialized
/// or holds no text content.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, GeneratorError> {
    let resp: AnthropicResponse =
        serde_json::from_str(body).map_err(|e| GeneratorError::Parse(e.to_string()))?;

    let text: String = resp
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        return Err(GeneratorError::Parse(
            "response contained no text content".to_owned(),
        ));
    }
    Ok(extract_source(&text))
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GeneratorError> {
        let api_request = build_request(&self.model, instruction);

        let response = self
            .client
            .post(ANTHROPIC_API_BASE)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }
}
