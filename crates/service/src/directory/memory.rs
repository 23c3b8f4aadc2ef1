use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use models::user::Role;
use models::{category, review, user};
use uuid::Uuid;

use super::{CategoryDirectory, CategoryStore, ReviewDirectory, ReviewStore, UserDirectory, UserSummary};
use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;

/// In-memory users, credentials, categories and reviews.
#[derive(Default)]
pub struct MemoryDirectory {
    users: DashMap<Uuid, user::Model>,
    emails: DashMap<String, Uuid>,
    credentials: DashMap<Uuid, Credentials>,
    categories: DashMap<Uuid, category::Model>,
    reviews: DashMap<Uuid, review::Model>,
}

impl MemoryDirectory {
    /// Insert a user directly; emails are unique case-insensitively.
    pub fn insert_user(&self, name: &str, email: &str, role: Role) -> Result<user::Model, AuthError> {
        let email = email.trim().to_lowercase();
        let now = Utc::now().into();
        let row = user::Model { id: Uuid::new_v4(), name: name.trim().to_string(), email: email.clone(), role, created_at: now, updated_at: now };
        match self.emails.entry(email) {
            Entry::Occupied(_) => Err(AuthError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(row.id);
                self.users.insert(row.id, row.clone());
                Ok(row)
            }
        }
    }

    /// Insert an active category of type `both`.
    pub fn insert_category(&self, name: &str) -> Result<category::Model, ServiceError> {
        let now = Utc::now().into();
        self.put_category(
            category::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: None,
                category_type: category::CategoryType::Both,
                image: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            true,
        )
    }

    fn put_category(&self, row: category::Model, fresh: bool) -> Result<category::Model, ServiceError> {
        let taken = self.categories.iter().any(|c| c.name == row.name && c.id != row.id);
        if taken {
            return Err(ServiceError::Conflict(format!("category name '{}' already exists", row.name)));
        }
        if fresh && self.categories.contains_key(&row.id) {
            return Err(ServiceError::Conflict(format!("category {} already exists", row.id)));
        }
        self.categories.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError> {
        Ok(self.users.get(&id).map(|u| UserSummary::from(u.value().clone())))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, ServiceError> {
        Ok(ids.iter().filter_map(|id| self.users.get(id).map(|u| UserSummary::from(u.value().clone()))).collect())
    }
}

#[async_trait]
impl CategoryDirectory for MemoryDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
        Ok(self.categories.get(&id).map(|c| c.value().clone()))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<category::Model>, ServiceError> {
        Ok(ids.iter().filter_map(|id| self.categories.get(id).map(|c| c.value().clone())).collect())
    }
}

#[async_trait]
impl CategoryStore for MemoryDirectory {
    async fn list(&self, include_inactive: bool) -> Result<Vec<category::Model>, ServiceError> {
        let mut out: Vec<category::Model> = self
            .categories
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .map(|c| c.value().clone())
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, ServiceError> {
        Ok(self.categories.iter().find(|c| c.name == name).map(|c| c.value().clone()))
    }

    async fn insert(&self, row: category::Model) -> Result<category::Model, ServiceError> {
        self.put_category(row, true)
    }

    async fn save(&self, row: category::Model) -> Result<category::Model, ServiceError> {
        self.put_category(row, false)
    }
}

#[async_trait]
impl ReviewDirectory for MemoryDirectory {
    async fn for_businesses(&self, business_ids: &[Uuid]) -> Result<Vec<review::Model>, ServiceError> {
        let mut out: Vec<review::Model> = self
            .reviews
            .iter()
            .filter(|r| business_ids.contains(&r.business_id))
            .map(|r| r.value().clone())
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}

#[async_trait]
impl ReviewStore for MemoryDirectory {
    async fn insert(&self, row: review::Model) -> Result<review::Model, ServiceError> {
        self.reviews.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AuthRepository for MemoryDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let email = email.trim().to_lowercase();
        let Some(id) = self.emails.get(&email).map(|e| *e.value()) else { return Ok(None) };
        Ok(self.users.get(&id).map(|u| AuthUser::from(u.value().clone())))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.users.get(&id).map(|u| AuthUser::from(u.value().clone())))
    }

    async fn create_user(&self, name: &str, email: &str, role: Role) -> Result<AuthUser, AuthError> {
        self.insert_user(name, email, role).map(AuthUser::from)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(self.credentials.get(&user_id).map(|c| c.value().clone()))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        if !self.users.contains_key(&user_id) {
            return Err(AuthError::NotFound);
        }
        let c = Credentials { user_id, password_hash, password_algorithm };
        self.credentials.insert(user_id, c.clone());
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_a_conflict_regardless_of_case() {
        let dir = MemoryDirectory::default();
        dir.insert_user("A", "a@example.com", Role::User).unwrap();
        assert!(matches!(dir.insert_user("B", "A@Example.com", Role::User), Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn category_names_are_unique_and_list_hides_inactive() {
        let dir = MemoryDirectory::default();
        let cafes = dir.insert_category("Cafes").unwrap();
        assert!(matches!(dir.insert_category("Cafes"), Err(ServiceError::Conflict(_))));

        let mut retired = dir.insert_category("Retired").unwrap();
        retired.is_active = false;
        CategoryStore::save(&dir, retired).await.unwrap();

        let names: Vec<String> = dir.list(false).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Cafes".to_string()]);
        assert_eq!(dir.list(true).await.unwrap().len(), 2);
        assert_eq!(CategoryDirectory::get(&dir, cafes.id).await.unwrap().map(|c| c.id), Some(cafes.id));
    }
}
