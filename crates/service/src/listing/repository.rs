use async_trait::async_trait;
use uuid::Uuid;

use super::{Listing, ListingFilter};
use crate::errors::ServiceError;

/// Durable keyed storage for one listing kind.
#[async_trait]
pub trait ListingRepository<L: Listing>: Send + Sync {
    /// Insert a new row. Fails with `Conflict` if the id is taken.
    async fn create(&self, row: L) -> Result<L, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<L>, ServiceError>;
    /// Rows matching `filter`, oldest first (ties broken by id).
    async fn find_many(&self, filter: &ListingFilter) -> Result<Vec<L>, ServiceError>;
    /// Upsert by id.
    async fn save(&self, row: L) -> Result<L, ServiceError>;
}
