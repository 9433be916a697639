use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::services::llm::{ChatMessage, Role};

// ============================================================================
// Generation
// ============================================================================

/// Prompt accepted by `POST /api/generateSVG`: a chat transcript or a bare string.
/// Transcript entries are not validated and reach the provider as sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Messages(Vec<Value>),
    Text(String),
}

impl Prompt {
    pub fn into_messages(self) -> Vec<Value> {
        match self {
            Prompt::Messages(messages) => messages,
            Prompt::Text(text) => vec![ChatMessage::new(Role::User, text).into()],
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateFormattedRequest {
    pub prompt: String,
}

/// Reply of the message-array endpoint: the model message as returned upstream
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateSvgResponse {
    #[schema(value_type = Object)]
    pub svg: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateFormattedResponse {
    pub svg: String,
}

/// Shape the model is instructed to answer with on the structured endpoint.
/// Either field may be missing or null in a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SvgOutput {
    pub message: Option<String>,
    #[serde(rename = "SVGCode")]
    pub svg_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Persistence
// ============================================================================

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct SaveSvgResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveSvgResponse {
    pub fn saved(id: impl Into<String>) -> Self {
        Self { success: true, id: Some(id.into()), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, id: None, error: Some(error.into()) }
    }
}

/// One document of the SVG collection. Everything besides `id` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<SvgRecord>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    30
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSvgQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 200))]
    pub per_page: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_keeps_transcript_verbatim() {
        let transcript = json!([
            {"role": "user", "content": "a red circle"},
            {"role": "assistant", "content": null, "refusal": "no"},
            {"role": "tool", "tool_call_id": "t1", "content": [{"type": "text", "text": "ok"}]}
        ]);
        let prompt: Prompt = serde_json::from_value(transcript.clone()).unwrap();
        assert_eq!(Value::Array(prompt.into_messages()), transcript);
    }

    #[test]
    fn test_prompt_accepts_plain_string() {
        let prompt: Prompt = serde_json::from_value(json!("a blue square")).unwrap();
        assert_eq!(prompt.into_messages(), vec![json!({"role": "user", "content": "a blue square"})]);
    }

    #[test]
    fn test_prompt_rejects_other_shapes() {
        assert!(serde_json::from_value::<Prompt>(json!({"prompt": "x"})).is_err());
        assert!(serde_json::from_value::<Prompt>(json!(42)).is_err());
    }

    #[test]
    fn test_save_response_shapes() {
        assert_eq!(
            serde_json::to_value(SaveSvgResponse::saved("abc123")).unwrap(),
            json!({"success": true, "id": "abc123"})
        );
        assert_eq!(
            serde_json::to_value(SaveSvgResponse::failed("boom")).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record: SvgRecord = serde_json::from_value(json!({
            "id": "r1",
            "collectionName": "svg",
            "prompt": "cat",
            "code": "<svg/>"
        }))
        .unwrap();
        assert_eq!(record.id, "r1");
        assert_eq!(record.fields["prompt"], "cat");
        assert_eq!(serde_json::to_value(&record).unwrap()["code"], "<svg/>");
    }

    #[test]
    fn test_list_query_bounds() {
        let ok = ListSvgQuery { page: 1, per_page: 30 };
        assert!(ok.validate().is_ok());
        let zero_page = ListSvgQuery { page: 0, per_page: 30 };
        assert!(zero_page.validate().is_err());
        let too_many = ListSvgQuery { page: 1, per_page: 500 };
        assert!(too_many.validate().is_err());
    }
}
