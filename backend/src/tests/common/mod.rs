// Common test utilities and helpers

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body, body::to_bytes, http, response::Response};
use serde_json::{Map, Value, json};

use crate::config::Config;
use crate::models::{RecordPage, SvgRecord};
use crate::services::llm::{ChatCompletionRequest, ChatCompletionResponse, LLMError};
use crate::services::{ChatCompletion, RecordStore, StoreError};
use crate::{AppState, build_router};

/// Chat client answering with a canned result and recording every request
pub struct MockChat {
    reply: Box<dyn Fn() -> Result<ChatCompletionResponse, LLMError> + Send + Sync>,
    pub requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockChat {
    /// Reply with a single assistant message carrying `content`
    pub fn replying(content: &str) -> Arc<Self> {
        let body = json!({
            "id": "chatcmpl-test",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        });
        Self::with_body(body)
    }

    pub fn with_body(body: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || {
                serde_json::from_value(body.clone()).map_err(|e| LLMError::ParseError(e.to_string()))
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(|| Err(LLMError::ApiError("connection refused".to_string()))),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> ChatCompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LLMError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)()
    }
}

/// In-memory record store; `fail_with` (status, message) makes every call fail
#[derive(Default)]
pub struct MockStore {
    pub records: Mutex<Vec<(String, SvgRecord)>>,
    pub next_id: Mutex<Option<String>>,
    pub fail_with: Option<(u16, String)>,
}

impl MockStore {
    pub fn returning_id(id: &str) -> Arc<Self> {
        Arc::new(Self { next_id: Mutex::new(Some(id.to_string())), ..Self::default() })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { fail_with: Some((400, message.to_string())), ..Self::default() })
    }

    /// Every call answers 404, as the store does for an unknown collection
    pub fn missing_collection(message: &str) -> Arc<Self> {
        Arc::new(Self { fail_with: Some((404, message.to_string())), ..Self::default() })
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.fail_with {
            Some((404, message)) => Err(StoreError::NotFound(message.clone())),
            Some((status, message)) => {
                Err(StoreError::Rejected { status: *status, message: message.clone() })
            },
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn create(&self, collection: &str, payload: &Value) -> Result<SvgRecord, StoreError> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let id = self
            .next_id
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| format!("rec{}", records.len() + 1));
        let fields = payload.as_object().cloned().unwrap_or_else(Map::new);
        let record = SvgRecord { id, fields };
        records.push((collection.to_string(), record.clone()));
        Ok(record)
    }

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, StoreError> {
        self.check()?;
        let records = self.records.lock().unwrap();
        let matching: Vec<SvgRecord> = records
            .iter()
            .rev()
            .filter(|(c, _)| c == collection)
            .map(|(_, r)| r.clone())
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok(RecordPage {
            page,
            per_page,
            total_items: total,
            total_pages: (total + per_page as i64 - 1) / per_page as i64,
            items,
        })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<SvgRecord, StoreError> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|(c, r)| c == collection && r.id == id)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| StoreError::NotFound("The requested resource wasn't found.".to_string()))
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.static_config.enabled = false;
    config.logging.file = None;
    config
}

pub fn test_app(chat: Arc<MockChat>, store: Arc<MockStore>) -> Router {
    build_router(Arc::new(AppState::new(test_config(), chat, store)))
}

pub fn json_post(uri: &str, body: Value) -> http::Request<Body> {
    http::Request::post(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_post(uri: &str, body: &'static str) -> http::Request<Body> {
    http::Request::post(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> http::Request<Body> {
    http::Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
