use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use models::category;
use service::category_service::{CategoryInput, CategoryPatch};
use uuid::Uuid;

use super::ListParams;
use crate::auth::{OptionalCaller, RequireCaller, ServerState};
use crate::errors::JsonApiError;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/:id", get(get_one).patch(update).delete(remove))
}

#[utoipa::path(get, path = "/categories", tag = "categories", params(("include_inactive" = Option<bool>, Query, description = "Admins only")), responses((status = 200, description = "Categories"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    let include_inactive = params.checked(caller.as_ref())?;
    Ok(Json(state.services.categories.list(include_inactive).await?))
}

#[utoipa::path(post, path = "/categories", tag = "categories", request_body = crate::openapi::CategoryInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Forbidden"), (status = 409, description = "Conflict")))]
pub async fn create(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    WithRejection(Json(input), _): WithRejection<Json<CategoryInput>, JsonApiError>,
) -> Result<(StatusCode, Json<category::Model>), JsonApiError> {
    let created = state.services.categories.create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category id")), responses((status = 200, description = "Category"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<category::Model>, JsonApiError> {
    Ok(Json(state.services.categories.get(id).await?))
}

#[utoipa::path(patch, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category id")), request_body = crate::openapi::CategoryInputDoc, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn update(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
    WithRejection(Json(patch), _): WithRejection<Json<CategoryPatch>, JsonApiError>,
) -> Result<Json<category::Model>, JsonApiError> {
    Ok(Json(state.services.categories.update(id, patch, &caller).await?))
}

#[utoipa::path(delete, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category id")), responses((status = 204, description = "Deactivated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn remove(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.services.categories.remove(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
