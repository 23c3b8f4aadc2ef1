use crate::db::connect;
use crate::{business, category, profession, review, user, user_credentials};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

/// Connect and migrate, or `None` when the database is unavailable.
async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn new_category(name: &str) -> category::ActiveModel {
    let now = Utc::now().into();
    category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        category_type: Set(category::CategoryType::Both),
        image: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn test_user_create_normalises_email_and_stores_role() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = format!("Owner_{}@Example.com", Uuid::new_v4());
    let created = user::create(&db, "Owner", &email, user::Role::BusinessOwner).await?;
    assert_eq!(created.email, email.to_lowercase());
    assert_eq!(created.role, user::Role::BusinessOwner);

    let found = user::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let cred = user_credentials::upsert_password(&db, created.id, "hash-1".into(), "argon2").await?;
    assert_eq!(cred.password_hash, "hash-1");
    let cred = user_credentials::upsert_password(&db, created.id, "hash-2".into(), "argon2").await?;
    assert_eq!(cred.password_hash, "hash-2");

    user_credentials::Entity::delete_by_id(created.id).exec(&db).await?;
    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_duplicate_category_name_is_rejected() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("cafes_{}", Uuid::new_v4());
    let first = new_category(&name).insert(&db).await?;
    let second = new_category(&name).insert(&db).await;
    assert!(second.is_err(), "unique name must be enforced");

    category::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_business_review_and_profession_rows_roll_back() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let txn = db.begin().await?;
    let now = Utc::now();
    let owner = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Joe".into()),
        email: Set(format!("joe_{}@example.com", Uuid::new_v4())),
        role: Set(user::Role::User),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    let cat = new_category(&format!("food_{}", Uuid::new_v4())).insert(&txn).await?;

    let biz = business::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Joe's Cafe".into()),
        phone: Set("555-1000".into()),
        website: Set(None),
        address: Set("1 Main St".into()),
        description: Set(None),
        image: Set("uploads/business_images/1-1.png".into()),
        owner_id: Set(owner.id),
        category_id: Set(cat.id),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    assert!(biz.is_active);

    let rev = review::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(biz.id),
        user_id: Set(owner.id),
        rating: Set(5),
        comment: Set(Some("great".into())),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    assert_eq!(rev.business_id, biz.id);

    let prof = profession::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Dr. Ada".into()),
        profession_type: Set(profession::ProfessionType::Doctor),
        biography: Set(None),
        location: Set(Some("Springfield".into())),
        contact: Set(None),
        specialties: Set(profession::join_specialties(&["Cardiology".to_string()])),
        image: Set(None),
        user_id: Set(owner.id),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    assert_eq!(prof.specialty_list(), vec!["Cardiology".to_string()]);

    txn.rollback().await?;
    assert!(business::Entity::find_by_id(biz.id).one(&db).await?.is_none());
    Ok(())
}
