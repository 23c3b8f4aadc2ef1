use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Listing, ListingFilter, ListingRepository};
use crate::errors::ServiceError;

/// `DashMap`-backed repository used by tests and `database.in_memory`.
pub struct InMemoryListingRepository<L> {
    rows: DashMap<Uuid, L>,
}

impl<L> Default for InMemoryListingRepository<L> {
    fn default() -> Self {
        Self { rows: DashMap::new() }
    }
}

impl<L: Listing> InMemoryListingRepository<L> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl<L: Listing> ListingRepository<L> for InMemoryListingRepository<L> {
    async fn create(&self, row: L) -> Result<L, ServiceError> {
        match self.rows.entry(row.id()) {
            Entry::Occupied(_) => Err(ServiceError::Conflict(format!("listing {} already exists", row.id()))),
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<L>, ServiceError> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn find_many(&self, filter: &ListingFilter) -> Result<Vec<L>, ServiceError> {
        let mut out: Vec<L> = self
            .rows
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        out.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(&b.id())));
        Ok(out)
    }

    async fn save(&self, row: L) -> Result<L, ServiceError> {
        self.rows.insert(row.id(), row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use models::business;

    use super::*;

    fn row(owner_id: Uuid, minutes_ago: i64, active: bool) -> business::Model {
        let at = (Utc::now() - Duration::minutes(minutes_ago)).into();
        business::Model {
            id: Uuid::new_v4(),
            name: "Shop".into(),
            phone: "1".into(),
            website: None,
            address: "A".into(),
            description: None,
            image: "uploads/business_images/x.png".into(),
            owner_id,
            category_id: Uuid::new_v4(),
            is_active: active,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict() {
        let repo: InMemoryListingRepository<business::Model> = InMemoryListingRepository::default();
        let r = row(Uuid::new_v4(), 0, true);
        repo.create(r.clone()).await.unwrap();
        assert!(matches!(repo.create(r).await, Err(ServiceError::Conflict(_))));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn scans_filter_and_order_by_creation() {
        let repo: InMemoryListingRepository<business::Model> = InMemoryListingRepository::default();
        let owner = Uuid::new_v4();
        let newer = row(owner, 1, true);
        let older = row(owner, 5, true);
        let hidden = row(owner, 3, false);
        for r in [newer.clone(), older.clone(), hidden.clone(), row(Uuid::new_v4(), 2, true)] {
            repo.create(r).await.unwrap();
        }

        let mine = repo.find_many(&ListingFilter::active().owned_by(owner)).await.unwrap();
        assert_eq!(mine.iter().map(|r| r.id).collect::<Vec<_>>(), vec![older.id, newer.id]);

        let all = repo.find_many(&ListingFilter::everything().owned_by(owner)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|r| r.id == hidden.id));
    }
}
