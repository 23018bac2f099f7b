use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{artist, festival, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::ownership::{ensure_owner, Resource};
use crate::schemas::{ApiResponse, AppState, StatusResponse};

/// Request body for creating a new artist
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateArtistRequest {
    pub name: String,
    pub category: String,
    /// Free text, e.g. "25"
    pub age: String,
}

/// Request body for updating an artist; only provided fields change
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub age: Option<String>,
}

/// Artist response model
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub age: String,
    pub image: String,
    pub festival_id: i32,
}

impl From<artist::Model> for ArtistResponse {
    fn from(model: artist::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            age: model.age,
            image: model.image,
            festival_id: model.festival_id,
        }
    }
}

/// Denormalized festival/owner summary returned with a single artist
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FestivalSummary {
    pub festival_id: i32,
    pub name: String,
    pub city: String,
    pub region: String,
    pub description: Option<String>,
    pub logo: String,
    pub owner_id: i32,
    pub email: String,
    /// Owner's join date, formatted as e.g. "Mar 05 2026"
    pub join_date: String,
}

/// Artist plus its festival/owner summary
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ArtistDetailResponse {
    pub artist_details: ArtistResponse,
    pub festival_details: FestivalSummary,
}

/// Create a new artist under the caller's festival
#[utoipa::path(
    post,
    path = "/artists",
    tag = "artists",
    request_body = CreateArtistRequest,
    responses(
        (status = 201, description = "Artist created", body = ApiResponse<ArtistResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn create_artist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ArtistResponse>>), ApiError> {
    trace!("Entering create_artist function");
    debug!("Creating artist '{}' for user_id: {}", request.name, user.id);

    let owned = festival::Entity::find()
        .filter(festival::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Festival"))?;

    let new_artist = artist::ActiveModel {
        name: Set(request.name),
        category: Set(request.category),
        age: Set(request.age),
        festival_id: Set(owned.id),
        // image takes its column default
        ..Default::default()
    };

    let artist_model = new_artist.insert(&state.db).await?;
    info!(
        "Artist created with ID: {}, name: {}, festival_id: {}",
        artist_model.id, artist_model.name, artist_model.festival_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ArtistResponse::from(artist_model))),
    ))
}

/// Get all artists
#[utoipa::path(
    get,
    path = "/artists",
    tag = "artists",
    responses(
        (status = 200, description = "Artists retrieved", body = ApiResponse<Vec<ArtistResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_artists(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ArtistResponse>>>, ApiError> {
    trace!("Entering get_artists function");

    let artists = artist::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} artists from database", artists.len());

    let responses: Vec<ArtistResponse> = artists.into_iter().map(ArtistResponse::from).collect();
    Ok(Json(ApiResponse::ok(responses)))
}

/// Get a specific artist by ID, with its festival and owner summary
#[utoipa::path(
    get,
    path = "/artists/{id}",
    tag = "artists",
    params(
        ("id" = i32, Path, description = "Artist ID"),
    ),
    responses(
        (status = 200, description = "Artist retrieved", body = ApiResponse<ArtistDetailResponse>),
        (status = 404, description = "Artist not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_artist(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArtistDetailResponse>>, ApiError> {
    trace!("Entering get_artist function for id: {id}");

    let artist_model = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Artist"))?;

    let festival_model = festival::Entity::find_by_id(artist_model.festival_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Festival"))?;

    let owner = user::Entity::find_by_id(festival_model.owner_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let response = ArtistDetailResponse {
        artist_details: ArtistResponse::from(artist_model),
        festival_details: FestivalSummary {
            festival_id: festival_model.id,
            name: festival_model.name,
            city: festival_model.city,
            region: festival_model.region,
            description: festival_model.description,
            logo: festival_model.logo,
            owner_id: owner.id,
            email: owner.email,
            join_date: owner.join_date.format("%b %d %Y").to_string(),
        },
    };

    Ok(Json(ApiResponse::ok(response)))
}

/// Update an artist; permitted only for the owner of its festival
#[utoipa::path(
    put,
    path = "/artists/{id}",
    tag = "artists",
    params(
        ("id" = i32, Path, description = "Artist ID"),
    ),
    request_body = UpdateArtistRequest,
    responses(
        (status = 200, description = "Artist updated", body = ApiResponse<ArtistResponse>),
        (status = 401, description = "Caller does not own the artist's festival", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Artist not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn update_artist(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateArtistRequest>,
) -> Result<Json<ApiResponse<ArtistResponse>>, ApiError> {
    trace!("Entering update_artist function for id: {id}");

    ensure_owner(&state.db, user.id, Resource::Artist(id)).await?;

    let existing = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Artist"))?;

    let mut active: artist::ActiveModel = existing.into();

    // Update only provided fields
    if let Some(name) = request.name {
        debug!("Updating artist {id} name to: {name}");
        active.name = Set(name);
    }
    if let Some(category) = request.category {
        debug!("Updating artist {id} category to: {category}");
        active.category = Set(category);
    }
    if let Some(age) = request.age {
        debug!("Updating artist {id} age to: {age}");
        active.age = Set(age);
    }

    let updated = active.update(&state.db).await?;
    info!("Artist {id} updated by user {}", user.id);

    Ok(Json(ApiResponse::ok(ArtistResponse::from(updated))))
}

/// Delete an artist; permitted only for the owner of its festival
#[utoipa::path(
    delete,
    path = "/artists/{id}",
    tag = "artists",
    params(
        ("id" = i32, Path, description = "Artist ID"),
    ),
    responses(
        (status = 200, description = "Artist deleted", body = StatusResponse),
        (status = 401, description = "Caller does not own the artist's festival", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Artist not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn delete_artist(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<StatusResponse>, ApiError> {
    trace!("Entering delete_artist function for id: {id}");

    ensure_owner(&state.db, user.id, Resource::Artist(id)).await?;

    let result = artist::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Artist {id} vanished between ownership check and delete");
        return Err(ApiError::NotFound("Artist"));
    }

    info!("Artist {id} deleted by user {}", user.id);
    Ok(Json(StatusResponse::ok()))
}
