use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use model::entities::{artist, festival};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::media::store_image;
use crate::ownership::{ensure_owner, Resource};
use crate::schemas::AppState;

/// Upload acknowledgement carrying the public image URL
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Always "ok"
    pub status: String,
    /// Public URL of the stored, normalized image
    pub filename: String,
}

/// Pull the first file field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("Could not read uploaded file".to_string()))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError::Validation("Missing file field".to_string()))
}

/// Upload a logo for the caller's own festival.
#[utoipa::path(
    post,
    path = "/uploadfile/profile",
    tag = "uploads",
    responses(
        (status = 200, description = "Logo stored and associated", body = UploadResponse),
        (status = 400, description = "Disallowed extension or malformed upload", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user, multipart))]
pub async fn upload_profile_logo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    trace!("Entering upload_profile_logo function for user_id: {}", user.id);

    let owned = festival::Entity::find()
        .filter(festival::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Festival"))?;

    let (original_filename, bytes) = read_upload(&mut multipart).await?;
    debug!(
        "Received logo upload '{original_filename}' ({} bytes) for festival {}",
        bytes.len(),
        owned.id
    );

    let filename = store_image(&state.config.media_dir, bytes, &original_filename).await?;

    let festival_id = owned.id;
    let mut active: festival::ActiveModel = owned.into();
    active.logo = Set(filename.clone());
    active.update(&state.db).await?;

    info!("Festival {festival_id} logo set to {filename}");
    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        filename: state.config.image_url(&filename),
    }))
}

/// Upload an image for an artist; permitted only for the owner of the
/// artist's festival.
#[utoipa::path(
    post,
    path = "/uploadfile/artist/{id}",
    tag = "uploads",
    params(
        ("id" = i32, Path, description = "Artist ID"),
    ),
    responses(
        (status = 200, description = "Image stored and associated", body = UploadResponse),
        (status = 400, description = "Disallowed extension or malformed upload", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Caller does not own the artist's festival", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Artist not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user, multipart))]
pub async fn upload_artist_image(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    trace!("Entering upload_artist_image function for id: {id}");

    // Ownership is checked before any bytes touch disk, so a rejected
    // caller never leaves an orphaned file behind.
    ensure_owner(&state.db, user.id, Resource::Artist(id)).await?;

    let (original_filename, bytes) = read_upload(&mut multipart).await?;
    debug!(
        "Received artist image upload '{original_filename}' ({} bytes) for artist {id}",
        bytes.len()
    );

    let filename = store_image(&state.config.media_dir, bytes, &original_filename).await?;

    let existing = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Artist"))?;

    let mut active: artist::ActiveModel = existing.into();
    active.image = Set(filename.clone());
    active.update(&state.db).await?;

    info!("Artist {id} image set to {filename}");
    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        filename: state.config.image_url(&filename),
    }))
}
