//! Application state container shared across Axum route handlers.

use sea_orm::DatabaseConnection;
use services::pull_service::PullService;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The `PullService`, whose clones share one writer lock.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pulls: PullService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, pulls: PullService) -> Self {
        Self { db, pulls }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn pulls(&self) -> &PullService {
        &self.pulls
    }
}
