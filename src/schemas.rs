use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::AppConfig;
use crate::email::Mailer;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Environment-driven configuration (secrets, media dir, public URL)
    pub config: Arc<AppConfig>,
    /// Outbound email transport for verification mail
    pub mailer: Mailer,
}

/// Uniform success envelope: `{"status": "ok", "data": ...}`
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always "ok" for successful responses
    pub status: String,
    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// Uniform error envelope: `{"status": "error", "detail": ...}`
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,
    /// Human-readable failure description
    pub detail: String,
}

/// Bare acknowledgement, used where no payload exists (e.g. deletes)
#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Always "ok"
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::issue_token,
        crate::handlers::auth::current_user_profile,
        crate::handlers::auth::verify_email,
        crate::handlers::users::register_user,
        crate::handlers::artists::create_artist,
        crate::handlers::artists::get_artists,
        crate::handlers::artists::get_artist,
        crate::handlers::artists::update_artist,
        crate::handlers::artists::delete_artist,
        crate::handlers::festivals::update_festival,
        crate::handlers::uploads::upload_profile_logo,
        crate::handlers::uploads::upload_artist_image,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ApiResponse<crate::handlers::auth::UserProfile>,
            ApiResponse<crate::handlers::artists::ArtistResponse>,
            ApiResponse<Vec<crate::handlers::artists::ArtistResponse>>,
            ApiResponse<crate::handlers::artists::ArtistDetailResponse>,
            ApiResponse<crate::handlers::festivals::FestivalResponse>,
            ErrorResponse,
            StatusResponse,
            HealthResponse,
            crate::handlers::auth::TokenRequest,
            crate::handlers::auth::TokenResponse,
            crate::handlers::auth::UserProfile,
            crate::handlers::users::RegisterRequest,
            crate::handlers::artists::CreateArtistRequest,
            crate::handlers::artists::UpdateArtistRequest,
            crate::handlers::artists::ArtistResponse,
            crate::handlers::artists::ArtistDetailResponse,
            crate::handlers::artists::FestivalSummary,
            crate::handlers::festivals::UpdateFestivalRequest,
            crate::handlers::festivals::FestivalResponse,
            crate::handlers::uploads::UploadResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Token issuance, profile and email verification"),
        (name = "users", description = "User registration"),
        (name = "artists", description = "Artist CRUD endpoints"),
        (name = "festivals", description = "Festival profile endpoints"),
        (name = "uploads", description = "Image upload endpoints"),
    ),
    info(
        title = "Mainstage API",
        description = "Festival management backend: accounts, festival profiles and artist rosters",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
