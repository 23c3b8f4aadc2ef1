use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use models::profession::ProfessionType;
use serde::Deserialize;
use service::caller::require_admin_for_inactive;
use service::listing::profession::{ProfessionDraft, ProfessionPatch, ProfessionResponse};
use uuid::Uuid;

use crate::auth::{OptionalCaller, RequireCaller, ServerState};
use crate::errors::JsonApiError;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/professions", get(list).post(create))
        .route("/professions/:id", get(get_one).patch(update).delete(remove))
        .route("/professions/user/:user_id", get(by_user))
        .route("/professions/location/:location", get(by_location))
        .route("/professions/specialty/:specialty", get(by_specialty))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfessionListParams {
    #[serde(default)]
    pub include_inactive: bool,
    pub profession_type: Option<ProfessionType>,
}

#[utoipa::path(post, path = "/professions", tag = "professions", request_body = crate::openapi::ProfessionInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Role may not create professions")))]
pub async fn create(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    WithRejection(Json(draft), _): WithRejection<Json<ProfessionDraft>, JsonApiError>,
) -> Result<(StatusCode, Json<ProfessionResponse>), JsonApiError> {
    let created = state.services.professions.create(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/professions", tag = "professions", params(("include_inactive" = Option<bool>, Query, description = "Admins only"), ("profession_type" = Option<String>, Query, description = "doctor | lawyer | engineer | teacher | accountant | other")), responses((status = 200, description = "Professions"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Query(params): Query<ProfessionListParams>,
) -> Result<Json<Vec<ProfessionResponse>>, JsonApiError> {
    require_admin_for_inactive(caller.as_ref(), params.include_inactive)?;
    Ok(Json(state.services.professions.find_all(params.include_inactive, params.profession_type).await?))
}

#[utoipa::path(get, path = "/professions/{id}", tag = "professions", params(("id" = Uuid, Path, description = "Profession id")), responses((status = 200, description = "Active profession"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfessionResponse>, JsonApiError> {
    Ok(Json(state.services.professions.find_one(id).await?))
}

#[utoipa::path(patch, path = "/professions/{id}", tag = "professions", params(("id" = Uuid, Path, description = "Profession id")), request_body = crate::openapi::ProfessionInputDoc, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
    WithRejection(Json(patch), _): WithRejection<Json<ProfessionPatch>, JsonApiError>,
) -> Result<Json<ProfessionResponse>, JsonApiError> {
    Ok(Json(state.services.professions.update(id, patch, &caller).await?))
}

#[utoipa::path(delete, path = "/professions/{id}", tag = "professions", params(("id" = Uuid, Path, description = "Profession id")), responses((status = 204, description = "Deactivated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn remove(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.services.professions.remove(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/professions/user/{user_id}", tag = "professions", params(("user_id" = Uuid, Path, description = "Owning user id")), responses((status = 200, description = "Active professions of the user; empty for other callers")))]
pub async fn by_user(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ProfessionResponse>>, JsonApiError> {
    Ok(Json(state.services.professions.find_by_owner(user_id, caller.as_ref()).await?))
}

#[utoipa::path(get, path = "/professions/location/{location}", tag = "professions", params(("location" = String, Path, description = "Exact location")), responses((status = 200, description = "Active professions at the location")))]
pub async fn by_location(
    State(state): State<ServerState>,
    Path(location): Path<String>,
) -> Result<Json<Vec<ProfessionResponse>>, JsonApiError> {
    Ok(Json(state.services.professions.find_by_location(&location).await?))
}

#[utoipa::path(get, path = "/professions/specialty/{specialty}", tag = "professions", params(("specialty" = String, Path, description = "Case-sensitive substring")), responses((status = 200, description = "Active professions listing the specialty")))]
pub async fn by_specialty(
    State(state): State<ServerState>,
    Path(specialty): Path<String>,
) -> Result<Json<Vec<ProfessionResponse>>, JsonApiError> {
    Ok(Json(state.services.professions.find_by_specialty(&specialty).await?))
}
