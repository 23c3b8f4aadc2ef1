use async_trait::async_trait;
use models::{category, review, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{CategoryDirectory, CategoryStore, ReviewDirectory, ReviewStore, UserDirectory, UserSummary};
use crate::errors::ServiceError;

/// SeaORM-backed directories over the `user`, `category` and `review` tables.
pub struct SeaOrmDirectory {
    pub db: DatabaseConnection,
}

fn category_active_model(row: &category::Model) -> category::ActiveModel {
    category::ActiveModel {
        id: Set(row.id),
        name: Set(row.name.clone()),
        description: Set(row.description.clone()),
        category_type: Set(row.category_type),
        image: Set(row.image.clone()),
        is_active: Set(row.is_active),
        created_at: Set(row.created_at),
        updated_at: Set(row.updated_at),
    }
}

#[async_trait]
impl UserDirectory for SeaOrmDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?.map(UserSummary::from))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = user::Entity::find().filter(user::Column::Id.is_in(ids.to_vec())).all(&self.db).await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}

#[async_trait]
impl CategoryDirectory for SeaOrmDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
        Ok(category::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<category::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(category::Entity::find().filter(category::Column::Id.is_in(ids.to_vec())).all(&self.db).await?)
    }
}

#[async_trait]
impl CategoryStore for SeaOrmDirectory {
    async fn list(&self, include_inactive: bool) -> Result<Vec<category::Model>, ServiceError> {
        let mut q = category::Entity::find();
        if !include_inactive {
            q = q.filter(category::Column::IsActive.eq(true));
        }
        Ok(q.order_by_asc(category::Column::Name).all(&self.db).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, ServiceError> {
        Ok(category::Entity::find().filter(category::Column::Name.eq(name)).one(&self.db).await?)
    }

    async fn insert(&self, row: category::Model) -> Result<category::Model, ServiceError> {
        Ok(category_active_model(&row).insert(&self.db).await?)
    }

    async fn save(&self, row: category::Model) -> Result<category::Model, ServiceError> {
        Ok(category_active_model(&row).update(&self.db).await?)
    }
}

#[async_trait]
impl ReviewDirectory for SeaOrmDirectory {
    async fn for_businesses(&self, business_ids: &[Uuid]) -> Result<Vec<review::Model>, ServiceError> {
        if business_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(review::Entity::find()
            .filter(review::Column::BusinessId.is_in(business_ids.to_vec()))
            .order_by_asc(review::Column::CreatedAt)
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[async_trait]
impl ReviewStore for SeaOrmDirectory {
    async fn insert(&self, row: review::Model) -> Result<review::Model, ServiceError> {
        let am = review::ActiveModel {
            id: Set(row.id),
            business_id: Set(row.business_id),
            user_id: Set(row.user_id),
            rating: Set(row.rating),
            comment: Set(row.comment),
            created_at: Set(row.created_at),
        };
        Ok(am.insert(&self.db).await?)
    }
}
