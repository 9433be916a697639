//! LLM Service Module
//!
//! Talks to an OpenAI-compatible chat-completion provider to turn prompts
//! into SVG markup.
//!
//! # Architecture
//! ```text
//! ┌─────────────────┐
//! │   SvgService    │  ← scenario prompts + reply reshaping
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ChatCompletion  │  ← trait (LLMClient over reqwest, mocks in tests)
//! └─────────────────┘
//! ```

mod client;
mod models;
mod scenario;
mod service;

pub use client::{ChatCompletion, LLMClient};
pub use models::*;
pub use scenario::SvgScenario;
pub use service::{SvgService, extract_svg_code, strip_code_fence};
