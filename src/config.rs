use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, info, warn};

use crate::email::Mailer;
use crate::schemas::AppState;

/// Environment-driven configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HS256 signing key for access and verification tokens
    pub jwt_secret: String,
    /// Access-token lifetime in seconds
    pub token_ttl_seconds: i64,
    /// On-disk directory backing `/static/images`
    pub media_dir: PathBuf,
    /// Base URL used for verification links and public image URLs
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set; falling back to an insecure development secret");
            "insecure-dev-secret".to_string()
        });

        let token_ttl_seconds = std::env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3600);

        let media_dir = PathBuf::from(
            std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./static/images".to_string()),
        );

        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            jwt_secret,
            token_ttl_seconds,
            media_dir,
            public_url,
        }
    }

    /// Public URL for a stored image filename.
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/static/images/{}", self.public_url, filename)
    }
}

/// Initialize application state: connect to the database, apply pending
/// migrations (the store is auto-created if absent) and prepare the media
/// directory and mailer.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    info!("Connecting to database: {database_url}");
    let db = Database::connect(database_url).await?;

    info!("Applying database migrations");
    Migrator::up(&db, None).await?;

    std::fs::create_dir_all(&config.media_dir)?;
    debug!("Media directory ready at {}", config.media_dir.display());

    let mailer = Mailer::from_env(&config.public_url)?;

    Ok(AppState {
        db,
        config: Arc::new(config),
        mailer,
    })
}
