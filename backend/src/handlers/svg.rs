//! SVG generation handlers

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};

use crate::AppState;
use crate::models::{
    ErrorResponse, GenerateFormattedRequest, GenerateFormattedResponse, GenerateSvgResponse, Prompt,
};
use crate::services::llm::ChatMessage;
use crate::utils::ApiResult;

/// Generate SVG from a chat transcript
///
/// Returns the model reply message as sent by the provider.
#[utoipa::path(
    post,
    path = "/api/generateSVG",
    request_body = Vec<ChatMessage>,
    responses(
        (status = 200, description = "Raw model message", body = GenerateSvgResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    ),
    tag = "SVG"
)]
pub async fn generate_svg(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<GenerateSvgResponse>> {
    let prompt: Prompt = serde_json::from_slice(&body)?;
    let messages = prompt.into_messages();
    tracing::info!("Generating SVG from {} message(s)", messages.len());

    let svg = state.svg_service.generate(messages).await?;
    Ok(Json(GenerateSvgResponse { svg }))
}

/// Generate SVG code from a single prompt using structured output
#[utoipa::path(
    post,
    path = "/api/generateSVGFormatted",
    request_body = GenerateFormattedRequest,
    responses(
        (status = 200, description = "Extracted SVG code", body = GenerateFormattedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    ),
    tag = "SVG"
)]
pub async fn generate_svg_formatted(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<GenerateFormattedResponse>> {
    let req: GenerateFormattedRequest = serde_json::from_slice(&body)?;
    tracing::info!("Prompt received: {}", req.prompt);

    let svg = state.svg_service.generate_formatted(&req.prompt).await?;
    tracing::debug!("Extracted {} bytes of SVG code", svg.len());
    Ok(Json(GenerateFormattedResponse { svg }))
}
