use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use models::{category, review};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Listing, ListingDetail, ListingFilter, ListingKind, ListingRepository, Visibility};
use crate::caller::Caller;
use crate::directory::{distinct, CategoryDirectory, ReviewDirectory, UserDirectory, UserSummary};
use crate::errors::ServiceError;

/// Lifecycle and authorization engine for one listing kind.
///
/// - create: role gate, validation, category and owner resolution, then persist
/// - update / remove: owner-or-admin, remove is a soft delete
/// - reads: inactive rows are excluded unless asked for
pub struct ListingEngine<K: ListingKind> {
    repo: Arc<dyn ListingRepository<K::Record>>,
    users: Arc<dyn UserDirectory>,
    categories: Arc<dyn CategoryDirectory>,
    reviews: Arc<dyn ReviewDirectory>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ListingKind> ListingEngine<K> {
    pub fn new(
        repo: Arc<dyn ListingRepository<K::Record>>,
        users: Arc<dyn UserDirectory>,
        categories: Arc<dyn CategoryDirectory>,
        reviews: Arc<dyn ReviewDirectory>,
    ) -> Self {
        Self { repo, users, categories, reviews, _kind: PhantomData }
    }

    /// Role gate for creation. Callers may check it before accepting an upload.
    pub fn authorize_create(&self, caller: &Caller) -> Result<(), ServiceError> {
        if K::CREATE_GATE.admits(caller.role) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!("role {} may not create {} listings", caller.role, K::NAME)))
        }
    }

    /// Owner-or-admin check against the stored row, for callers that must refuse
    /// a stranger before accepting an upload.
    pub async fn authorize_update(&self, id: Uuid, caller: &Caller) -> Result<(), ServiceError> {
        let row = self.load(id, K::FIND_ONE).await?;
        self.authorize_manage(caller, &row)
    }

    #[instrument(skip(self, draft, media), fields(kind = K::NAME, caller_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, draft: K::Draft, media: Option<String>) -> Result<K::Record, ServiceError> {
        self.authorize_create(caller)?;
        let valid = K::validate(draft, media)?;
        if let Some(category_id) = K::category_of(&valid) {
            self.resolve_category(category_id).await?;
        }
        let owner = self.users.get(caller.id).await?.ok_or(ServiceError::NotFound("User"))?;

        let row = K::build(valid, Uuid::new_v4(), owner.id, Utc::now().into());
        let saved = self.repo.create(row).await?;
        info!(listing_id = %saved.id(), owner_id = %owner.id, "listing_created");
        Ok(saved)
    }

    pub async fn find_all(&self, include_inactive: bool) -> Result<Vec<ListingDetail<K::Record>>, ServiceError> {
        let filter = if include_inactive { ListingFilter::everything() } else { ListingFilter::active() };
        self.find_where(filter).await
    }

    pub async fn find_where(&self, filter: ListingFilter) -> Result<Vec<ListingDetail<K::Record>>, ServiceError> {
        let rows = self.repo.find_many(&filter).await?;
        self.hydrate(rows).await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ListingDetail<K::Record>, ServiceError> {
        let row = self.load(id, K::FIND_ONE).await?;
        self.hydrate_one(row).await
    }

    #[instrument(skip(self, patch), fields(kind = K::NAME, listing_id = %id, caller_id = %caller.id))]
    pub async fn update(&self, id: Uuid, patch: K::Patch, caller: &Caller) -> Result<K::Record, ServiceError> {
        let mut row = self.load(id, K::FIND_ONE).await?;
        self.authorize_manage(caller, &row)?;
        K::check_patch(&patch)?;
        if let Some(category_id) = K::patch_category(&patch) {
            self.resolve_category(category_id).await?;
        }
        K::merge(&mut row, patch);
        row.touch(Utc::now().into());
        let saved = self.repo.save(row).await?;
        info!("listing_updated");
        Ok(saved)
    }

    /// Soft delete. Already-inactive rows are accepted silently.
    #[instrument(skip(self), fields(kind = K::NAME, listing_id = %id, caller_id = %caller.id))]
    pub async fn remove(&self, id: Uuid, caller: &Caller) -> Result<(), ServiceError> {
        let mut row = self.load(id, Visibility::IncludeInactive).await?;
        self.authorize_manage(caller, &row)?;
        if !row.is_active() {
            debug!("listing_already_inactive");
            return Ok(());
        }
        row.set_active(false);
        row.touch(Utc::now().into());
        self.repo.save(row).await?;
        info!("listing_soft_deleted");
        Ok(())
    }

    /// Active listings of `owner_id`. Callers other than the owner or an admin get
    /// an empty list rather than an error.
    pub async fn find_by_owner(&self, owner_id: Uuid, caller: Option<&Caller>) -> Result<Vec<ListingDetail<K::Record>>, ServiceError> {
        match caller {
            Some(c) if c.can_manage(owner_id) => {}
            _ => {
                warn!(kind = K::NAME, caller_id = ?caller.map(|c| c.id), owner_id = %owner_id, "find_by_owner_not_permitted");
                return Ok(Vec::new());
            }
        }
        self.find_where(ListingFilter::active().owned_by(owner_id)).await
    }

    pub async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<ListingDetail<K::Record>>, ServiceError> {
        self.find_where(ListingFilter::active().in_category(category_id)).await
    }

    /// Attach owners, categories and, where the kind asks for it, reviews.
    pub async fn hydrate(&self, rows: Vec<K::Record>) -> Result<Vec<ListingDetail<K::Record>>, ServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let owner_ids = distinct(rows.iter().map(|r| r.owner_id()));
        let owners: HashMap<Uuid, UserSummary> =
            self.users.get_many(&owner_ids).await?.into_iter().map(|u| (u.id, u)).collect();

        let category_ids = distinct(rows.iter().filter_map(|r| r.category_id()));
        let categories: HashMap<Uuid, category::Model> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            self.categories.get_many(&category_ids).await?.into_iter().map(|c| (c.id, c)).collect()
        };

        let mut reviews: HashMap<Uuid, Vec<review::Model>> = HashMap::new();
        if K::ATTACH_REVIEWS {
            let ids: Vec<Uuid> = rows.iter().map(|r| r.id()).collect();
            for r in self.reviews.for_businesses(&ids).await? {
                reviews.entry(r.business_id).or_default().push(r);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| ListingDetail {
                owner: owners.get(&row.owner_id()).cloned(),
                category: row.category_id().and_then(|c| categories.get(&c).cloned()),
                reviews: K::ATTACH_REVIEWS.then(|| reviews.remove(&row.id()).unwrap_or_default()),
                listing: row,
            })
            .collect())
    }

    pub async fn hydrate_one(&self, row: K::Record) -> Result<ListingDetail<K::Record>, ServiceError> {
        self.hydrate(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Internal("hydration dropped a row".into()))
    }

    async fn load(&self, id: Uuid, visibility: Visibility) -> Result<K::Record, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|row| visibility.admits(row))
            .ok_or(ServiceError::NotFound(K::NAME))
    }

    /// Soft-deleted categories count as absent.
    async fn resolve_category(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.categories.get(id).await? {
            Some(c) if c.is_active => Ok(()),
            _ => Err(ServiceError::NotFound("Category")),
        }
    }

    fn authorize_manage(&self, caller: &Caller, row: &K::Record) -> Result<(), ServiceError> {
        if caller.can_manage(row.owner_id()) {
            Ok(())
        } else {
            warn!(kind = K::NAME, caller_id = %caller.id, owner_id = %row.owner_id(), "listing_mutation_forbidden");
            Err(ServiceError::forbidden(format!("only the owner or an admin may modify this {}", K::NAME)))
        }
    }
}
