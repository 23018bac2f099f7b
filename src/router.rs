use crate::handlers::{
    artists::{create_artist, delete_artist, get_artist, get_artists, update_artist},
    auth::{current_user_profile, issue_token, verify_email},
    festivals::update_festival,
    health::health_check,
    uploads::{upload_artist_image, upload_profile_logo},
    users::register_user,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let media_dir = state.config.media_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth and account routes
        .route("/token", post(issue_token))
        .route("/user/me", post(current_user_profile))
        .route("/registration", post(register_user))
        .route("/verification", get(verify_email))
        // Image uploads
        .route("/uploadfile/profile", post(upload_profile_logo))
        .route("/uploadfile/artist/:id", post(upload_artist_image))
        // Artist CRUD routes
        .route("/artists", post(create_artist))
        .route("/artists", get(get_artists))
        .route("/artists/:id", get(get_artist))
        .route("/artists/:id", put(update_artist))
        .route("/artists/:id", delete(delete_artist))
        // Festival profile routes
        .route("/festival/:id", put(update_festival))
        // Stored images, public under /static/images
        .nest_service("/static/images", ServeDir::new(media_dir))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
