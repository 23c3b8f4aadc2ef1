//! PostgreSQL repositories. Filters are pushed into SQL, then every row is
//! re-checked with [`ListingFilter::matches`] so both backends agree exactly.
use async_trait::async_trait;
use models::{business, event, profession};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{ListingFilter, ListingRepository};
use crate::errors::ServiceError;

pub struct SeaOrmBusinessRepository {
    pub db: DatabaseConnection,
}

pub struct SeaOrmEventRepository {
    pub db: DatabaseConnection,
}

pub struct SeaOrmProfessionRepository {
    pub db: DatabaseConnection,
}

fn business_active_model(r: &business::Model) -> business::ActiveModel {
    business::ActiveModel {
        id: Set(r.id),
        name: Set(r.name.clone()),
        phone: Set(r.phone.clone()),
        website: Set(r.website.clone()),
        address: Set(r.address.clone()),
        description: Set(r.description.clone()),
        image: Set(r.image.clone()),
        owner_id: Set(r.owner_id),
        category_id: Set(r.category_id),
        is_active: Set(r.is_active),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

fn event_active_model(r: &event::Model) -> event::ActiveModel {
    event::ActiveModel {
        id: Set(r.id),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        location: Set(r.location.clone()),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        image: Set(r.image.clone()),
        organizer_id: Set(r.organizer_id),
        category_id: Set(r.category_id),
        is_active: Set(r.is_active),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

fn profession_active_model(r: &profession::Model) -> profession::ActiveModel {
    profession::ActiveModel {
        id: Set(r.id),
        name: Set(r.name.clone()),
        profession_type: Set(r.profession_type),
        biography: Set(r.biography.clone()),
        location: Set(r.location.clone()),
        contact: Set(r.contact.clone()),
        specialties: Set(r.specialties.clone()),
        image: Set(r.image.clone()),
        user_id: Set(r.user_id),
        is_active: Set(r.is_active),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

#[async_trait]
impl ListingRepository<business::Model> for SeaOrmBusinessRepository {
    async fn create(&self, row: business::Model) -> Result<business::Model, ServiceError> {
        Ok(business_active_model(&row).insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<business::Model>, ServiceError> {
        Ok(business::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_many(&self, filter: &ListingFilter) -> Result<Vec<business::Model>, ServiceError> {
        use business::Column;
        let mut q = business::Entity::find();
        if !filter.include_inactive {
            q = q.filter(Column::IsActive.eq(true));
        }
        if let Some(owner) = filter.owner_id {
            q = q.filter(Column::OwnerId.eq(owner));
        }
        if let Some(category) = filter.category_id {
            q = q.filter(Column::CategoryId.eq(category));
        }
        let rows = q.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn save(&self, row: business::Model) -> Result<business::Model, ServiceError> {
        use business::Column;
        business::Entity::insert(business_active_model(&row))
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Name,
                        Column::Phone,
                        Column::Website,
                        Column::Address,
                        Column::Description,
                        Column::Image,
                        Column::CategoryId,
                        Column::IsActive,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl ListingRepository<event::Model> for SeaOrmEventRepository {
    async fn create(&self, row: event::Model) -> Result<event::Model, ServiceError> {
        Ok(event_active_model(&row).insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<event::Model>, ServiceError> {
        Ok(event::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_many(&self, filter: &ListingFilter) -> Result<Vec<event::Model>, ServiceError> {
        use event::Column;
        let mut q = event::Entity::find();
        if !filter.include_inactive {
            q = q.filter(Column::IsActive.eq(true));
        }
        if let Some(owner) = filter.owner_id {
            q = q.filter(Column::OrganizerId.eq(owner));
        }
        if let Some(category) = filter.category_id {
            q = q.filter(Column::CategoryId.eq(category));
        }
        if let Some(location) = &filter.location {
            q = q.filter(Column::Location.eq(location.as_str()));
        }
        let rows = q.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn save(&self, row: event::Model) -> Result<event::Model, ServiceError> {
        use event::Column;
        event::Entity::insert(event_active_model(&row))
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Name,
                        Column::Description,
                        Column::Location,
                        Column::StartDate,
                        Column::EndDate,
                        Column::Image,
                        Column::CategoryId,
                        Column::IsActive,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl ListingRepository<profession::Model> for SeaOrmProfessionRepository {
    async fn create(&self, row: profession::Model) -> Result<profession::Model, ServiceError> {
        Ok(profession_active_model(&row).insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<profession::Model>, ServiceError> {
        Ok(profession::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_many(&self, filter: &ListingFilter) -> Result<Vec<profession::Model>, ServiceError> {
        use profession::Column;
        let mut q = profession::Entity::find();
        if !filter.include_inactive {
            q = q.filter(Column::IsActive.eq(true));
        }
        if let Some(owner) = filter.owner_id {
            q = q.filter(Column::UserId.eq(owner));
        }
        if let Some(location) = &filter.location {
            q = q.filter(Column::Location.eq(location.as_str()));
        }
        if let Some(specialty) = &filter.specialty {
            // LIKE is case-sensitive on PostgreSQL; wildcards in the input are
            // settled by the re-check below.
            q = q.filter(Column::Specialties.contains(specialty.as_str()));
        }
        if let Some(kind) = filter.profession_type {
            q = q.filter(Column::ProfessionType.eq(kind));
        }
        let rows = q.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn save(&self, row: profession::Model) -> Result<profession::Model, ServiceError> {
        use profession::Column;
        profession::Entity::insert(profession_active_model(&row))
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Name,
                        Column::ProfessionType,
                        Column::Biography,
                        Column::Location,
                        Column::Contact,
                        Column::Specialties,
                        Column::Image,
                        Column::IsActive,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Listing;
    use crate::test_support::get_db;
    use chrono::Utc;
    use models::user::Role;

    async fn seed(db: &DatabaseConnection) -> anyhow::Result<(models::user::Model, models::category::Model)> {
        let owner = models::user::create(db, "Repo Owner", &format!("repo_{}@example.com", Uuid::new_v4()), Role::Professional).await?;
        let now = Utc::now().into();
        let cat = models::category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(format!("repo_cat_{}", Uuid::new_v4())),
            description: Set(None),
            category_type: Set(models::category::CategoryType::Both),
            image: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        Ok((owner, cat))
    }

    #[tokio::test]
    async fn business_save_upserts_and_scan_filters_inactive() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let (owner, cat) = seed(&db).await?;
        let repo = SeaOrmBusinessRepository { db: db.clone() };
        let now = Utc::now().into();
        let mut row = business::Model {
            id: Uuid::new_v4(),
            name: "Joe's Cafe".into(),
            phone: "555-1000".into(),
            website: None,
            address: "1 Main St".into(),
            description: None,
            image: "uploads/business_images/1-1.png".into(),
            owner_id: owner.id,
            category_id: cat.id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        repo.create(row.clone()).await?;
        row.set_active(false);
        repo.save(row.clone()).await?;

        let stored = repo.find_by_id(row.id).await?.expect("row persists after soft delete");
        assert!(!stored.is_active);
        let active = repo.find_many(&ListingFilter::active().owned_by(owner.id)).await?;
        assert!(active.iter().all(|b| b.id != row.id));
        let all = repo.find_many(&ListingFilter::everything().owned_by(owner.id)).await?;
        assert!(all.iter().any(|b| b.id == row.id));
        Ok(())
    }

    #[tokio::test]
    async fn profession_specialty_scan_is_case_sensitive() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let (owner, _) = seed(&db).await?;
        let repo = SeaOrmProfessionRepository { db: db.clone() };
        let now = Utc::now().into();
        let marker = format!("Spec{}", Uuid::new_v4().simple());
        let row = profession::Model {
            id: Uuid::new_v4(),
            name: "Dr. Ada".into(),
            profession_type: profession::ProfessionType::Doctor,
            biography: None,
            location: Some("Springfield".into()),
            contact: None,
            specialties: profession::join_specialties(&[marker.clone(), "Tax".into()]),
            image: None,
            user_id: owner.id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        repo.create(row.clone()).await?;

        let hits = repo.find_many(&ListingFilter::active().with_specialty(marker.clone())).await?;
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![row.id]);
        let misses = repo.find_many(&ListingFilter::active().with_specialty(marker.to_lowercase())).await?;
        assert!(misses.is_empty());
        Ok(())
    }
}
