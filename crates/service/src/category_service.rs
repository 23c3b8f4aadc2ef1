use std::sync::Arc;

use chrono::Utc;
use models::category::{self, CategoryType};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::caller::Caller;
use crate::directory::CategoryStore;
use crate::errors::ServiceError;
use crate::validation::Violations;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category_type: Option<CategoryType>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_type: Option<CategoryType>,
    pub image: Option<String>,
}

/// Admin CRUD over the category directory. Categories are soft-deleted like listings.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(caller_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, input: CategoryInput) -> Result<category::Model, ServiceError> {
        caller.require_admin()?;
        let mut v = Violations::new();
        let name = v.require_text("name", input.name);
        v.finish()?;
        let name = name.unwrap_or_default().trim().to_string();
        if self.store.find_by_name(&name).await?.is_some() {
            return Err(ServiceError::Conflict(format!("category name '{name}' already exists")));
        }
        let now = Utc::now().into();
        let row = self
            .store
            .insert(category::Model {
                id: Uuid::new_v4(),
                name,
                description: input.description,
                category_type: input.category_type.unwrap_or_default(),
                image: input.image,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(category_id = %row.id, name = %row.name, "category_created");
        Ok(row)
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<category::Model>, ServiceError> {
        self.store.list(include_inactive).await
    }

    pub async fn get(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        self.store.get(id).await?.ok_or(ServiceError::NotFound("Category"))
    }

    #[instrument(skip(self, patch), fields(category_id = %id, caller_id = %caller.id))]
    pub async fn update(&self, id: Uuid, patch: CategoryPatch, caller: &Caller) -> Result<category::Model, ServiceError> {
        caller.require_admin()?;
        let mut row = self.get(id).await?;
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::invalid("name", "must not be empty"));
            }
            if let Some(other) = self.store.find_by_name(&name).await? {
                if other.id != id {
                    return Err(ServiceError::Conflict(format!("category name '{name}' already exists")));
                }
            }
            row.name = name;
        }
        if let Some(d) = patch.description {
            row.description = Some(d);
        }
        if let Some(t) = patch.category_type {
            row.category_type = t;
        }
        if let Some(i) = patch.image {
            row.image = Some(i);
        }
        row.updated_at = Utc::now().into();
        let saved = self.store.save(row).await?;
        info!("category_updated");
        Ok(saved)
    }

    #[instrument(skip(self), fields(category_id = %id, caller_id = %caller.id))]
    pub async fn remove(&self, id: Uuid, caller: &Caller) -> Result<(), ServiceError> {
        caller.require_admin()?;
        let mut row = self.get(id).await?;
        if !row.is_active {
            return Ok(());
        }
        row.is_active = false;
        row.updated_at = Utc::now().into();
        self.store.save(row).await?;
        info!("category_soft_deleted");
        Ok(())
    }
}
