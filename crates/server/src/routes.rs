use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Json, Router,
};
use common::types::Health;
use serde::Deserialize;
use service::caller::require_admin_for_inactive;
use service::Caller;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{self as caller_auth, ServerState};
use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod businesses;
pub mod categories;
pub mod events;
pub mod professions;
pub mod reviews;

/// Room for the text fields that travel with an upload.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `?include_inactive=true` on list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

impl ListParams {
    /// Inactive rows are only listed for admins.
    pub fn checked(&self, caller: Option<&Caller>) -> Result<bool, JsonApiError> {
        require_admin_for_inactive(caller, self.include_inactive)?;
        Ok(self.include_inactive)
    }
}

/// Build the full application router: API routes behind the caller-resolution
/// middleware, uploaded media, and the OpenAPI docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let body_limit = state.uploads.max_file_bytes + FORM_OVERHEAD_BYTES;
    let media_dir = ServeDir::new(&state.uploads.dir);

    let api = Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(categories::router())
        .merge(businesses::router())
        .merge(events::router())
        .merge(professions::router())
        .merge(reviews::router())
        .layer(middleware::from_fn_with_state(state.clone(), caller_auth::resolve_caller))
        .with_state(state);

    Router::new()
        .merge(api)
        .nest_service("/uploads", media_dir)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
