#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use rand::RngCore;
    use sea_orm::{Database, DatabaseConnection};

    use crate::config::AppConfig;
    use crate::email::Mailer;
    use crate::router::create_router;
    use crate::schemas::AppState;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Test configuration with a fresh temporary media directory
    pub fn test_config() -> AppConfig {
        let mut suffix = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut suffix);
        let media_dir = std::env::temp_dir().join(format!(
            "mainstage-test-{}",
            suffix.iter().map(|b| format!("{b:02x}")).collect::<String>()
        ));
        std::fs::create_dir_all(&media_dir).expect("Failed to create test media dir");

        AppConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_seconds: 3600,
            media_dir,
            public_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create AppState for testing; the mailer runs in log-only mode
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let config = test_config();
        let mailer = Mailer::disabled(&config.public_url);

        AppState {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let state = setup_test_app_state().await;
        create_router(state)
    }
}
