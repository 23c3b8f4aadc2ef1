//! Read-side collaborators the listing engines consult: users, categories and
//! reviews. The engines never mutate these rows.
use async_trait::async_trait;
use models::user::Role;
use models::{category, review, user};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryDirectory;
pub use seaorm::SeaOrmDirectory;

/// Public projection of a user. Credential material is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email, role: m.role }
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError>;
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, ServiceError>;
}

#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError>;
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<category::Model>, ServiceError>;
}

/// Full category persistence, used by the category admin service.
#[async_trait]
pub trait CategoryStore: CategoryDirectory {
    async fn list(&self, include_inactive: bool) -> Result<Vec<category::Model>, ServiceError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, ServiceError>;
    async fn insert(&self, row: category::Model) -> Result<category::Model, ServiceError>;
    async fn save(&self, row: category::Model) -> Result<category::Model, ServiceError>;
}

#[async_trait]
pub trait ReviewDirectory: Send + Sync {
    /// Reviews of the given businesses, oldest first.
    async fn for_businesses(&self, business_ids: &[Uuid]) -> Result<Vec<review::Model>, ServiceError>;
}

#[async_trait]
pub trait ReviewStore: ReviewDirectory {
    async fn insert(&self, row: review::Model) -> Result<review::Model, ServiceError>;
}

/// Deduplicate ids while keeping first-seen order.
pub(crate) fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
