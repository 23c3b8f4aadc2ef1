//! Wiring of every service over one storage backend.
use std::sync::Arc;

use models::{business, event, profession};
use sea_orm::DatabaseConnection;

use crate::auth::repo::seaorm::SeaOrmAuthRepository;
use crate::auth::{AuthConfig, AuthService};
use crate::category_service::CategoryService;
use crate::directory::{MemoryDirectory, SeaOrmDirectory};
use crate::listing::business::BusinessService;
use crate::listing::event::EventService;
use crate::listing::memory::InMemoryListingRepository;
use crate::listing::profession::ProfessionService;
use crate::listing::seaorm::{SeaOrmBusinessRepository, SeaOrmEventRepository, SeaOrmProfessionRepository};
use crate::listing::{ListingEngine, ListingRepository};
use crate::review_service::ReviewService;

#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub categories: Arc<CategoryService>,
    pub reviews: Arc<ReviewService>,
    pub businesses: Arc<BusinessService>,
    pub events: Arc<EventService>,
    pub professions: Arc<ProfessionService>,
}

impl Services {
    /// PostgreSQL-backed wiring.
    pub fn seaorm(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let dir = Arc::new(SeaOrmDirectory { db: db.clone() });
        let businesses: Arc<dyn ListingRepository<business::Model>> = Arc::new(SeaOrmBusinessRepository { db: db.clone() });
        let events: Arc<dyn ListingRepository<event::Model>> = Arc::new(SeaOrmEventRepository { db: db.clone() });
        let professions: Arc<dyn ListingRepository<profession::Model>> = Arc::new(SeaOrmProfessionRepository { db: db.clone() });
        Self {
            auth: Arc::new(AuthService::new(Arc::new(SeaOrmAuthRepository { db }), auth)),
            categories: Arc::new(CategoryService::new(dir.clone())),
            reviews: Arc::new(ReviewService::new(dir.clone(), businesses.clone())),
            businesses: Arc::new(ListingEngine::new(businesses, dir.clone(), dir.clone(), dir.clone())),
            events: Arc::new(ListingEngine::new(events, dir.clone(), dir.clone(), dir.clone())),
            professions: Arc::new(ProfessionService::new(ListingEngine::new(professions, dir.clone(), dir.clone(), dir))),
        }
    }

    /// Process-local wiring backed by `dashmap`.
    pub fn in_memory(auth: AuthConfig) -> Self {
        Self::in_memory_with(Arc::new(MemoryDirectory::default()), auth)
    }

    /// In-memory wiring over a caller-supplied directory, so tests can seed users
    /// and categories without going through registration.
    pub fn in_memory_with(dir: Arc<MemoryDirectory>, auth: AuthConfig) -> Self {
        let businesses: Arc<dyn ListingRepository<business::Model>> = Arc::new(InMemoryListingRepository::default());
        let events: Arc<dyn ListingRepository<event::Model>> = Arc::new(InMemoryListingRepository::default());
        let professions: Arc<dyn ListingRepository<profession::Model>> = Arc::new(InMemoryListingRepository::default());
        Self {
            auth: Arc::new(AuthService::new(dir.clone(), auth)),
            categories: Arc::new(CategoryService::new(dir.clone())),
            reviews: Arc::new(ReviewService::new(dir.clone(), businesses.clone())),
            businesses: Arc::new(ListingEngine::new(businesses, dir.clone(), dir.clone(), dir.clone())),
            events: Arc::new(ListingEngine::new(events, dir.clone(), dir.clone(), dir.clone())),
            professions: Arc::new(ProfessionService::new(ListingEngine::new(professions, dir.clone(), dir.clone(), dir))),
        }
    }
}
