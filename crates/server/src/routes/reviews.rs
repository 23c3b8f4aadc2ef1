use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use models::review;
use service::review_service::ReviewInput;
use uuid::Uuid;

use crate::auth::{RequireCaller, ServerState};
use crate::errors::JsonApiError;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/reviews", post(create))
        .route("/reviews/business/:business_id", get(for_business))
}

#[utoipa::path(post, path = "/reviews", tag = "reviews", request_body = crate::openapi::ReviewInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 404, description = "Business not found")))]
pub async fn create(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    WithRejection(Json(input), _): WithRejection<Json<ReviewInput>, JsonApiError>,
) -> Result<(StatusCode, Json<review::Model>), JsonApiError> {
    let created = state.services.reviews.create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/reviews/business/{business_id}", tag = "reviews", params(("business_id" = Uuid, Path, description = "Business id")), responses((status = 200, description = "Reviews, newest last")))]
pub async fn for_business(
    State(state): State<ServerState>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<review::Model>>, JsonApiError> {
    Ok(Json(state.services.reviews.list_for_business(business_id).await?))
}
