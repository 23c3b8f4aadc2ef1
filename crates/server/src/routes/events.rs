use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use models::event;
use service::listing::event::{EventDraft, EventPatchForm};
use service::listing::ListingDetail;
use service::media::MediaFolder;
use uuid::Uuid;

use super::ListParams;
use crate::auth::{OptionalCaller, RequireCaller, ServerState};
use crate::errors::JsonApiError;
use crate::upload::{discard_upload, store_upload, MultipartForm};

type Detail = ListingDetail<event::Model>;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/events", get(list).post(create))
        .route("/events/:id", get(get_one).patch(update).delete(remove))
        .route("/events/organizer/:organizer_id", get(by_organizer))
        .route("/events/category/:category_id", get(by_category))
}

/// The role gate runs before the upload reaches the media store; a create that
/// fails afterwards discards the stored file.
#[utoipa::path(post, path = "/events", tag = "events", request_body(content = crate::openapi::EventFormDoc, content_type = "multipart/form-data"), responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Role may not create events"), (status = 404, description = "Category not found")))]
pub async fn create(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    multipart: Multipart,
) -> Result<(StatusCode, Json<event::Model>), JsonApiError> {
    state.services.events.authorize_create(&caller)?;
    let mut form = MultipartForm::read(multipart, "image").await?;
    let image = store_upload(state.media.as_ref(), MediaFolder::Events, form.take_file()).await?;
    let draft = EventDraft {
        name: form.take("name"),
        description: form.take("description"),
        location: form.take("location"),
        start_date: form.take("start_date"),
        end_date: form.take("end_date"),
        category_id: form.take("category_id"),
    };
    match state.services.events.create(&caller, draft, image.clone()).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => {
            discard_upload(state.media.as_ref(), image.as_deref()).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(get, path = "/events", tag = "events", params(("include_inactive" = Option<bool>, Query, description = "Admins only")), responses((status = 200, description = "Events with organizer and category"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    let include_inactive = params.checked(caller.as_ref())?;
    Ok(Json(state.services.events.find_all(include_inactive).await?))
}

#[utoipa::path(get, path = "/events/{id}", tag = "events", params(("id" = Uuid, Path, description = "Event id")), responses((status = 200, description = "Active event"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail>, JsonApiError> {
    Ok(Json(state.services.events.find_one(id).await?))
}

/// Unknown ids and strangers are refused before the form is read.
#[utoipa::path(patch, path = "/events/{id}", tag = "events", params(("id" = Uuid, Path, description = "Event id")), request_body(content = crate::openapi::EventFormDoc, content_type = "multipart/form-data"), responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<event::Model>, JsonApiError> {
    state.services.events.authorize_update(id, &caller).await?;
    let mut form = MultipartForm::read(multipart, "image").await?;
    let fields = EventPatchForm {
        name: form.take("name"),
        description: form.take("description"),
        location: form.take("location"),
        start_date: form.take("start_date"),
        end_date: form.take("end_date"),
        category_id: form.take("category_id"),
    };
    let mut patch = fields.parse(None)?;
    patch.image = store_upload(state.media.as_ref(), MediaFolder::Events, form.take_file()).await?;
    let image = patch.image.clone();
    match state.services.events.update(id, patch, &caller).await {
        Ok(updated) => Ok(Json(updated)),
        Err(e) => {
            discard_upload(state.media.as_ref(), image.as_deref()).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(delete, path = "/events/{id}", tag = "events", params(("id" = Uuid, Path, description = "Event id")), responses((status = 204, description = "Deactivated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn remove(
    State(state): State<ServerState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.services.events.remove(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/events/organizer/{organizer_id}", tag = "events", params(("organizer_id" = Uuid, Path, description = "Organizer user id")), responses((status = 200, description = "Active events of the organizer; empty for other callers")))]
pub async fn by_organizer(
    State(state): State<ServerState>,
    OptionalCaller(caller): OptionalCaller,
    Path(organizer_id): Path<Uuid>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    Ok(Json(state.services.events.find_by_owner(organizer_id, caller.as_ref()).await?))
}

#[utoipa::path(get, path = "/events/category/{category_id}", tag = "events", params(("category_id" = Uuid, Path, description = "Category id")), responses((status = 200, description = "Active events in the category")))]
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<Detail>>, JsonApiError> {
    Ok(Json(state.services.events.find_by_category(category_id).await?))
}
