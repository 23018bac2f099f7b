use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use model::entities::user;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::hash_password;
use crate::error::{is_unique_violation, ApiError};
use crate::events::{self, UserCreated};
use crate::schemas::{ApiResponse, AppState};

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 3, max = 20))]
    pub username: String,
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Raw password; only its hash is stored
    #[validate(length(min = 8))]
    pub password: String,
}

/// Register a new user.
///
/// On success the user's festival is provisioned (named after the user) and
/// a verification email is dispatched, in that order. The verification flag
/// and join date are server-controlled, never client input.
#[utoipa::path(
    post,
    path = "/registration",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<String>),
        (status = 400, description = "Validation failure or duplicate username/email", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), ApiError> {
    trace!("Entering register_user function");
    debug!("Registering user with username: {}", request.username);

    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let password_hash = hash_password(&request.password)?;

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        password_hash: Set(password_hash),
        is_verified: Set(false),
        join_date: Set(Utc::now()),
        ..Default::default()
    };

    let user_model = match new_user.insert(&state.db).await {
        Ok(user_model) => user_model,
        Err(db_error) if is_unique_violation(&db_error) => {
            debug!("Registration rejected, duplicate key: {db_error}");
            return Err(ApiError::Validation(
                "Username or email already taken".to_string(),
            ));
        }
        Err(db_error) => {
            error!("Failed to create user '{}': {db_error}", request.username);
            return Err(db_error.into());
        }
    };

    info!(
        "User created with ID: {}, username: {}",
        user_model.id, user_model.username
    );

    // Festival provisioning and email dispatch happen strictly after the
    // user row commits.
    let username = user_model.username.clone();
    events::user_created(&state, UserCreated { user: user_model }).await?;

    let response = ApiResponse::ok(format!("Hello {username}, Welcome"));
    Ok((StatusCode::CREATED, Json(response)))
}
