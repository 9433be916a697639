//! svg-studio: prompt-to-SVG web service
//!
//! Pages go through the locale middleware; `/api/*` routes proxy prompts to an
//! OpenAI-compatible chat-completion provider and store results in a
//! PocketBase-compatible record store.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

rust_i18n::i18n!("locales", fallback = "en");

use config::Config;
use services::{ChatCompletion, LLMClient, PocketBaseClient, RecordStore, SvgService};

/// Shared, immutable per-process state handed to every handler
pub struct AppState {
    pub config: Config,
    pub svg_service: SvgService,
    pub record_store: Arc<dyn RecordStore>,
    /// Collection that holds SVG records
    pub collection: String,
}

impl AppState {
    pub fn new(
        config: Config,
        llm_client: Arc<dyn ChatCompletion>,
        record_store: Arc<dyn RecordStore>,
    ) -> Self {
        let svg_service = SvgService::new(llm_client, &config.llm);
        let collection = config.record_store.collection.clone();
        Self { config, svg_service, record_store, collection }
    }

    /// Build the real remote clients from configuration
    pub fn from_config(config: Config) -> Self {
        let connection = config.record_store.connection();
        tracing::info!(
            "Record store: {} ({} mode, collection '{}')",
            connection.base_url,
            config.record_store.mode,
            connection.collection
        );
        tracing::info!(
            "Chat completion: {} (models: {}, {})",
            config.llm.base_url,
            config.llm.chat_model,
            config.llm.structured_model
        );

        let llm_client: Arc<dyn ChatCompletion> = Arc::new(LLMClient::new(&config.llm));
        let record_store: Arc<dyn RecordStore> = Arc::new(PocketBaseClient::new(&connection));
        Self::new(config, llm_client, record_store)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::svg::generate_svg,
        handlers::svg::generate_svg_formatted,
        handlers::record::save_svg,
        handlers::record::list_svgs,
        handlers::record::get_svg,
        handlers::health::health,
    ),
    components(schemas(
        models::GenerateFormattedRequest,
        models::GenerateFormattedResponse,
        models::GenerateSvgResponse,
        models::SvgOutput,
        models::ErrorResponse,
        models::SaveSvgResponse,
        models::HealthResponse,
        services::llm::ChatMessage,
        services::llm::Role,
    )),
    tags(
        (name = "SVG", description = "Prompt to SVG generation"),
        (name = "Records", description = "Saved SVG records"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/generateSVG", post(handlers::svg::generate_svg))
        .route("/api/generateSVGFormatted", post(handlers::svg::generate_svg_formatted))
        .route("/api/saveSVG", post(handlers::record::save_svg))
        .route("/api/svgs", get(handlers::record::list_svgs))
        .route("/api/svgs/:id", get(handlers::record::get_svg))
        .route("/api/health", get(handlers::health::health));

    let pages = Router::new()
        .route("/", get(handlers::page::index))
        .route("/i18n", get(handlers::page::i18n_table));

    let mut app = Router::new()
        .merge(api)
        .merge(pages)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app = if state.config.static_config.enabled {
        tracing::info!("Serving static files from {}", state.config.static_config.web_root);
        app.fallback_service(ServeDir::new(&state.config.static_config.web_root))
    } else {
        app.fallback(handlers::page::not_found)
    };

    app.layer(axum_middleware::from_fn(middleware::locale_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
