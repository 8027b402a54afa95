use std::sync::Arc;
use std::time::Duration;

use adapter::repository::{event::EventRepository, user::UserRepository};
use kernel::database::Database;
use shared::config::AppConfig;
use shared::error::AppResult;

/// Dependency-injection container built once at startup and cloned into
/// every request handler.
#[derive(Clone)]
pub struct AppRegistry {
    db: Arc<dyn Database>,
    request_timeout: Duration,
}

impl AppRegistry {
    pub fn new(db: Arc<dyn Database>, app_config: &AppConfig) -> Self {
        Self {
            db,
            request_timeout: Duration::from_secs_f64(app_config.general.request_timeout_in_s),
        }
    }

    pub fn database(&self) -> Arc<dyn Database> {
        self.db.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Hands out a user repository, connecting the database lazily on
    /// first use and provisioning the table (both idempotent).
    pub async fn user_repository(&self) -> AppResult<UserRepository> {
        self.ensure_connected().await?;
        let repo = UserRepository::new(self.db.clone());
        repo.create_repository().await?;
        Ok(repo)
    }

    pub async fn event_repository(&self) -> AppResult<EventRepository> {
        self.ensure_connected().await?;
        let repo = EventRepository::new(self.db.clone());
        repo.create_repository().await?;
        Ok(repo)
    }

    async fn ensure_connected(&self) -> AppResult<()> {
        if !self.db.is_connected() {
            self.db.connect().await?;
        }
        Ok(())
    }
}
