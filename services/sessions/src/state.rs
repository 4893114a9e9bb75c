use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCatalogRepository, DbChemistryRepository, DbExposureRepository, DbMatchRepository,
    DbSessionRepository, DbStatsRepository, DbSwipeRepository, DbTasteSignalRepository,
};
use crate::realtime::BroadcastHub;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn catalog_repo(&self) -> DbCatalogRepository {
        DbCatalogRepository {
            db: self.db.clone(),
        }
    }

    pub fn swipe_repo(&self) -> DbSwipeRepository {
        DbSwipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn match_repo(&self) -> DbMatchRepository {
        DbMatchRepository {
            db: self.db.clone(),
        }
    }

    pub fn exposure_repo(&self) -> DbExposureRepository {
        DbExposureRepository {
            db: self.db.clone(),
        }
    }

    pub fn taste_repo(&self) -> DbTasteSignalRepository {
        DbTasteSignalRepository {
            db: self.db.clone(),
        }
    }

    pub fn chemistry_repo(&self) -> DbChemistryRepository {
        DbChemistryRepository {
            db: self.db.clone(),
        }
    }

    pub fn stats_repo(&self) -> DbStatsRepository {
        DbStatsRepository {
            db: self.db.clone(),
        }
    }
}
