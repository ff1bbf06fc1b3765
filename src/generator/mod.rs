//! Generator abstraction layer.
//!
//! Defines the [`Generator`] trait the pipeline drives: instruction text in,
//! raw component source text out. The trait is a black box to the
//! orchestrator — retries are the pipeline's concern, transport and prompt
//! mechanics are the implementation's.
//!
//! One implementation ships: [`anthropic::AnthropicGenerator`] over the
//! `/v1/messages` API.

use async_trait::async_trait;
use regex::Regex;

pub mod anthropic;

/// Errors returned by generator implementations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP transport failure.
    #[error("generator request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("generator response parse error: {0}")]
    Parse(String),
    /// Upstream service responded with an error status.
    #[error("generator returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The generator cannot satisfy the request with current configuration.
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Produces component source text from instruction text.
///
/// Implementations must be `Send + Sync` so the pipeline can be shared
/// across async task boundaries.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate raw component source for the given instruction.
    ///
    /// The instruction may be the original request or a feedback-augmented
    /// regeneration prompt; the generator does not distinguish.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] on API, network, or parse failure.
    async fn generate(&self, instruction: &str) -> Result<String, GeneratorError>;
}

// ---------------------------------------------------------------------------
// HTTP helpers shared by implementations
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `GeneratorError::Request` on transport failure,
/// `GeneratorError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, GeneratorError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GeneratorError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"sk-ant-[A-Za-z0-9_\-]{10,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"Bearer [A-Za-z0-9_\-\.]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Response post-processing
// ---------------------------------------------------------------------------

/// Extract component source from model output.
///
/// Models frequently wrap code in a fenced block with prose around it; when
/// a fence is present the fenced content wins, otherwise the text is
/// returned trimmed.
pub fn extract_source(text: &str) -> String {
    let Some(open) = text.find("```") else {
        return text.trim().to_owned();
    };
    let after_fence = &text[open.saturating_add(3)..];
    // Skip the language tag on the opening fence line.
    let content_start = after_fence.find('\n').map_or(0, |i| i.saturating_add(1));
    let content = &after_fence[content_start..];
    match content.find("```") {
        Some(close) => content[..close].trim().to_owned(),
        None => content.trim().to_owned(),
    }
}
