//! Post-registration side effects, expressed as an explicit domain event
//! with a dedicated listener instead of an ORM lifecycle hook. Ordering is
//! the invariant: the festival row is created strictly after the user row
//! commits, and the verification email is dispatched strictly after that.

use model::entities::{festival, user};
use sea_orm::{ActiveModelTrait, Set};
use tracing::{error, info};

use crate::auth;
use crate::error::ApiError;
use crate::schemas::AppState;

/// Emitted by the registration handler once the user row is committed.
pub struct UserCreated {
    pub user: user::Model,
}

/// Listener: provision the user's festival (named after the user), then
/// fire off the verification email. Festival-creation failure fails the
/// registration request; email failure is logged and swallowed.
pub async fn user_created(
    state: &AppState,
    event: UserCreated,
) -> Result<festival::Model, ApiError> {
    let festival = festival::ActiveModel {
        name: Set(event.user.username.clone()),
        owner_id: Set(event.user.id),
        // city, region, logo and description take their column defaults
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Provisioned festival '{}' (id {}) for user {}",
        festival.name, festival.id, event.user.id
    );

    let token = auth::encode_verification_token(&state.config.jwt_secret, event.user.id)?;
    let mailer = state.mailer.clone();
    let recipient = event.user.email.clone();
    let username = event.user.username.clone();

    // Best-effort dispatch; delivery failure must not undo the writes above.
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&recipient, &username, &token).await {
            error!("Failed to send verification email to {recipient}: {e}");
        }
    });

    Ok(festival)
}
