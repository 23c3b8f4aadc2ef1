use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, column) triples for the read paths: owner and category scans.
const INDEXES: [(&str, &str, &str); 7] = [
    ("idx_business_owner", "business", "owner_id"),
    ("idx_business_category", "business", "category_id"),
    ("idx_event_organizer", "event", "organizer_id"),
    ("idx_event_category", "event", "category_id"),
    ("idx_profession_user", "profession", "user_id"),
    ("idx_profession_location", "profession", "location"),
    ("idx_review_business", "review", "business_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Alias::new(column))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
