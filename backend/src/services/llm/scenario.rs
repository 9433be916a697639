//! SVG generation scenarios
//!
//! Each scenario owns its fixed system instruction and, when the provider
//! supports it, the structured-output contract sent along with the request.

use serde_json::{Value, json};

use super::models::{ChatCompletionRequest, ChatMessage};

const FREEFORM_PROMPT: &str = "You are an SVG code generator. Generate SVG code for the following prompt. \
Make sure to include ids for each part of the generated SVG.";

const STRUCTURED_PROMPT: &str = "You are an SVG generator. Respond ONLY with valid JSON in the format: \
{ \"message\": string, \"SVGCode\": string }";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgScenario {
    /// Caller supplies the transcript, the raw reply message is returned
    Freeform,
    /// Single prompt, reply must be a `{message, SVGCode}` JSON object
    Structured,
}

impl SvgScenario {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            SvgScenario::Freeform => FREEFORM_PROMPT,
            SvgScenario::Structured => STRUCTURED_PROMPT,
        }
    }

    /// JSON schema `response_format` for providers with structured output
    pub fn response_format(&self) -> Option<Value> {
        match self {
            SvgScenario::Freeform => None,
            SvgScenario::Structured => Some(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "svg",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "message": {"type": "string"},
                            "SVGCode": {"type": "string"}
                        },
                        "required": ["message", "SVGCode"],
                        "additionalProperties": false
                    }
                }
            })),
        }
    }

    /// Prepend the scenario's system message to `messages`, which are sent as given
    pub fn build_request(
        &self,
        model: &str,
        messages: Vec<Value>,
        with_schema: bool,
    ) -> ChatCompletionRequest {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(self.system_prompt()).into());
        all.extend(messages);

        ChatCompletionRequest {
            model: model.to_string(),
            messages: all,
            response_format: if with_schema { self.response_format() } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_is_prepended() {
        let req = SvgScenario::Freeform.build_request(
            "openai/gpt-oss-20b",
            vec![
                ChatMessage::user("a cat").into(),
                json!({"role": "assistant", "content": null, "refusal": "no"}),
            ],
            true,
        );
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[0]["role"], "system");
        assert!(req.messages[0]["content"].as_str().unwrap().contains("include ids"));
        assert_eq!(req.messages[1], json!({"role": "user", "content": "a cat"}));
        assert_eq!(req.messages[2]["refusal"], "no");
        assert!(req.response_format.is_none());
    }

    #[test]
    fn test_structured_schema_is_optional() {
        let with = SvgScenario::Structured.build_request("codellama", vec![], true);
        let format = with.response_format.unwrap();
        assert_eq!(format["json_schema"]["schema"]["required"][1], "SVGCode");

        let without = SvgScenario::Structured.build_request("codellama", vec![], false);
        assert!(without.response_format.is_none());
    }
}
