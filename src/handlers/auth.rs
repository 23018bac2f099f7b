use axum::{
    extract::{Query, State},
    response::{Html, Json},
    Form,
};
use model::entities::{festival, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::{self, CurrentUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Form body for token issuance
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Profile of the authenticated caller
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub verified: bool,
    /// Formatted as e.g. "Mar 05 2026"
    pub joined_date: String,
    /// Public URL of the caller's festival logo
    pub logo: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificationParams {
    pub token: String,
}

/// Issue an access token for a username/password pair.
#[utoipa::path(
    post,
    path = "/token",
    tag = "auth",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn issue_token(
    State(state): State<AppState>,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    trace!("Entering issue_token function");
    debug!("Token requested for username: {}", request.username);

    let token =
        auth::authenticate(&state.db, &state.config, &request.username, &request.password).await?;

    info!("Token issued for username: {}", request.username);
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// Return the authenticated caller's profile, including the logo URL of
/// their festival.
#[utoipa::path(
    post,
    path = "/user/me",
    tag = "auth",
    responses(
        (status = 200, description = "Caller profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn current_user_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    trace!("Entering current_user_profile function for user_id: {}", user.id);

    let owned = festival::Entity::find()
        .filter(festival::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Festival"))?;

    let profile = UserProfile {
        username: user.username,
        email: user.email,
        verified: user.is_verified,
        joined_date: user.join_date.format("%b %d %Y").to_string(),
        logo: state.config.image_url(&owned.logo),
    };

    Ok(Json(ApiResponse::ok(profile)))
}

/// Verify an email address from the mailed link.
///
/// The token must decode to an existing, still-unverified user; a used or
/// invalid token yields 401. The flag flips exactly once.
#[utoipa::path(
    get,
    path = "/verification",
    tag = "auth",
    params(
        ("token" = String, Query, description = "Verification token from the email link"),
    ),
    responses(
        (status = 200, description = "HTML confirmation page", body = String, content_type = "text/html"),
        (status = 401, description = "Invalid, expired or already-used token", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, params))]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerificationParams>,
) -> Result<Html<String>, ApiError> {
    trace!("Entering verify_email function");

    let claims = auth::decode_token(
        &state.config.jwt_secret,
        &params.token,
        auth::TokenPurpose::Verification,
    )?;

    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::invalid_token)?;

    if user.is_verified {
        debug!("Verification token replay for user_id: {}", user.id);
        return Err(ApiError::invalid_token());
    }

    let username = user.username.clone();
    let mut active: user::ActiveModel = user.into();
    active.is_verified = Set(true);
    active.update(&state.db).await?;

    info!("Email verified for username: {username}");
    Ok(Html(confirmation_page(&username)))
}

fn confirmation_page(username: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Account verified</title></head>\n\
         <body style=\"font-family: sans-serif; text-align: center; margin-top: 4em;\">\n\
         <h1>Welcome to Mainstage, {username}!</h1>\n\
         <p>Your account has been verified. You can now log in and manage your festival.</p>\n\
         </body>\n\
         </html>\n"
    )
}
