use chrono::NaiveDate;
use models::clock::Clock;
use sea_orm::DatabaseConnection;
use std::{path::PathBuf, sync::Arc};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub clock: Arc<dyn Clock>,
    pub media_root: Arc<PathBuf>,
    pub admin_role: Arc<str>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        clock: Arc<dyn Clock>,
        media_root: PathBuf,
        admin_role: &str,
    ) -> Self {
        Self {
            db,
            clock,
            media_root: Arc::new(media_root),
            admin_role: Arc::from(admin_role),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
