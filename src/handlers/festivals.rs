use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::festival;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{is_unique_violation, ApiError};
use crate::ownership::{ensure_owner, Resource};
use crate::schemas::{ApiResponse, AppState};

/// Request body for updating a festival profile; only provided fields
/// change. The logo is managed through the upload endpoint, not here.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateFestivalRequest {
    /// Festival name (must stay unique)
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
}

/// Festival response model
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FestivalResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub region: String,
    pub description: Option<String>,
    pub logo: String,
    pub owner_id: i32,
}

impl From<festival::Model> for FestivalResponse {
    fn from(model: festival::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            city: model.city,
            region: model.region,
            description: model.description,
            logo: model.logo,
            owner_id: model.owner_id,
        }
    }
}

/// Update a festival profile; permitted only for its owner
#[utoipa::path(
    put,
    path = "/festival/{id}",
    tag = "festivals",
    params(
        ("id" = i32, Path, description = "Festival ID"),
    ),
    request_body = UpdateFestivalRequest,
    responses(
        (status = 200, description = "Festival updated", body = ApiResponse<FestivalResponse>),
        (status = 400, description = "Festival name already taken", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Caller is not the owner", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Festival not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn update_festival(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateFestivalRequest>,
) -> Result<Json<ApiResponse<FestivalResponse>>, ApiError> {
    trace!("Entering update_festival function for id: {id}");

    ensure_owner(&state.db, user.id, Resource::Festival(id)).await?;

    let existing = festival::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Festival"))?;

    let mut active: festival::ActiveModel = existing.into();

    // Update only provided fields
    if let Some(name) = request.name {
        debug!("Updating festival {id} name to: {name}");
        active.name = Set(name);
    }
    if let Some(city) = request.city {
        debug!("Updating festival {id} city to: {city}");
        active.city = Set(city);
    }
    if let Some(region) = request.region {
        debug!("Updating festival {id} region to: {region}");
        active.region = Set(region);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }

    let updated = match active.update(&state.db).await {
        Ok(updated) => updated,
        Err(db_error) if is_unique_violation(&db_error) => {
            debug!("Festival update rejected, duplicate name: {db_error}");
            return Err(ApiError::Validation(
                "Festival name already taken".to_string(),
            ));
        }
        Err(db_error) => {
            error!("Failed to update festival {id}: {db_error}");
            return Err(db_error.into());
        }
    };

    info!("Festival {id} updated by user {}", user.id);
    Ok(Json(ApiResponse::ok(FestivalResponse::from(updated))))
}
