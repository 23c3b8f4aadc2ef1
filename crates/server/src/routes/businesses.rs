use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use models::business;
use service::listing::business::{BusinessDraft, BusinessPatch};
use service::listing::ListingDetail;
use service::media::MediaFolder;
use uuid::Uuid;

use super::ListParams;
use crate::auth::{OptionalCaller, RequireCaller, ServerState};
use crate::errors::JsonApiError;
use crate::upload::{discard_upload, store_upload, MultipartForm};

type Detail = ListingDetail<business::Model>;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/businesses", get(list).post(create))
        .route("/businesses/:id", get(get_one).patch(update).delete(remove))
        .route("/businesses/owner/:owner_id", get(by_owner))
        .route("/businesses/category/:category_id", get(by_category))
}

#[utoipa::path(post, path = "/businesses", tag = "businesses", request_body(content = crate::openapi::BusinessFormDoc, content_type = "multipart/form-data"), responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized"), (status = 404, description = "Category not found")))]
pub async fn create(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    multipart: Multipart,
) -> Result<(StatusCode, Json<business::Model>), JsonApiError> {
    state.services.businesses.authorize_create(&caller)?;
    let mut form = MultipartForm::read(multipart, "image").await?;
    let image = store_upload(state.media.as_ref(), MediaFolder::BusinessImages, form.take_file()).await?;
    let draft = BusinessDraft {
        name: form.take("name"),
        phone: form.take("phone"),
        website: form.take("website"),
        address: form.take("address"),
        description: form.take("description"),
        category_id: form.take("category_id"),
    };
    match state.services.businesses.create(&caller, draft, image.clone()).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => {
            discard_upload(state.media.as_ref(), image.as_deref()).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(get, path = "/businesses", tag = "businesses", params(("include_inactive" = Option<bool>, Query, description = "Admins only")), responses((status = 200, description = "Businesses with owner, category and reviews"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    let include_inactive = params.checked(caller.as_ref())?;
    Ok(Json(state.services.businesses.find_all(include_inactive).await?))
}

#[utoipa::path(get, path = "/businesses/{id}", tag = "businesses", params(("id" = Uuid, Path, description = "Business id")), responses((status = 200, description = "Business, including deactivated ones"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail>, JsonApiError> {
    Ok(Json(state.services.businesses.find_one(id).await?))
}

#[utoipa::path(patch, path = "/businesses/{id}", tag = "businesses", params(("id" = Uuid, Path, description = "Business id")), request_body = crate::openapi::BusinessPatchDoc, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
    WithRejection(Json(patch), _): WithRejection<Json<BusinessPatch>, JsonApiError>,
) -> Result<Json<business::Model>, JsonApiError> {
    Ok(Json(state.services.businesses.update(id, patch, &caller).await?))
}

#[utoipa::path(delete, path = "/businesses/{id}", tag = "businesses", params(("id" = Uuid, Path, description = "Business id")), responses((status = 204, description = "Deactivated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn remove(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.services.businesses.remove(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/businesses/owner/{owner_id}", tag = "businesses", params(("owner_id" = Uuid, Path, description = "Owner user id")), responses((status = 200, description = "Active businesses of the owner; empty for other callers")))]
pub async fn by_owner(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    Ok(Json(state.services.businesses.find_by_owner(owner_id, caller.as_ref()).await?))
}

#[utoipa::path(get, path = "/businesses/category/{category_id}", tag = "businesses", params(("category_id" = Uuid, Path, description = "Category id")), responses((status = 200, description = "Active businesses in the category")))]
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    Ok(Json(state.services.businesses.find_by_category(category_id).await?))
}
