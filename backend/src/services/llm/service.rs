use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::client::ChatCompletion;
use super::models::{ChatMessage, LLMError};
use super::scenario::SvgScenario;
use crate::config::LlmConfig;
use crate::models::SvgOutput;

/// Optional Markdown fence around a model reply, with an optional info string
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(?:```[\w-]*)?\s*(.*?)\s*(?:```)?\s*$").expect("code fence regex")
});

/// Strip a Markdown code fence (```` ```json ... ``` ````) and surrounding whitespace
pub fn strip_code_fence(raw: &str) -> &str {
    CODE_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or_else(|| raw.trim(), |m| m.as_str())
}

/// Parse a structured reply and return its `SVGCode`, or "" when the field is missing.
/// The reply must be a JSON object.
pub fn extract_svg_code(raw: &str) -> Result<String, LLMError> {
    let cleaned = strip_code_fence(raw);
    let parsed: Value =
        serde_json::from_str(cleaned).map_err(|e| LLMError::ParseError(e.to_string()))?;

    if !parsed.is_object() {
        return Err(LLMError::ParseError(format!("expected a JSON object, got {}", parsed)));
    }

    let output: SvgOutput =
        serde_json::from_value(parsed).map_err(|e| LLMError::ParseError(e.to_string()))?;
    if let Some(message) = output.message.as_deref().filter(|m| !m.is_empty()) {
        tracing::debug!("Model message: {}", message);
    }
    Ok(output.svg_code.unwrap_or_default())
}

/// Generation use-cases on top of a chat-completion provider
pub struct SvgService {
    client: Arc<dyn ChatCompletion>,
    chat_model: String,
    structured_model: String,
    json_schema_output: bool,
}

impl SvgService {
    pub fn new(client: Arc<dyn ChatCompletion>, config: &LlmConfig) -> Self {
        Self {
            client,
            chat_model: config.chat_model.clone(),
            structured_model: config.structured_model.clone(),
            json_schema_output: config.json_schema_output,
        }
    }

    /// Send the transcript behind the freeform system prompt.
    /// Returns the first reply message untouched, or "" if there is none.
    pub async fn generate(&self, messages: Vec<Value>) -> Result<Value, LLMError> {
        let request = SvgScenario::Freeform.build_request(&self.chat_model, messages, false);
        let completion = self.client.complete(&request).await?;

        match completion.first_message() {
            Some(message) => {
                tracing::debug!("Generated SVG message ({} choices)", completion.choices.len());
                serde_json::to_value(message).map_err(|e| LLMError::ParseError(e.to_string()))
            },
            None => {
                tracing::warn!("Chat completion returned no choices");
                Ok(Value::String(String::new()))
            },
        }
    }

    /// Ask for a `{message, SVGCode}` object and return the SVG code
    pub async fn generate_formatted(&self, prompt: &str) -> Result<String, LLMError> {
        let request = SvgScenario::Structured.build_request(
            &self.structured_model,
            vec![ChatMessage::user(prompt).into()],
            self.json_schema_output,
        );
        let completion = self.client.complete(&request).await?;

        let raw = completion.first_content();
        tracing::debug!("Raw model output: {}", raw);
        extract_svg_code(raw)
    }
}
