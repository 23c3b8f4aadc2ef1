//! Create `business` table owned by a user and classified by a category.
//! Rows are soft-deleted through `is_active`; there is no cascading delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Business::Table)
                    .if_not_exists()
                    .col(uuid(Business::Id).primary_key())
                    .col(string_len(Business::Name, 255).not_null())
                    .col(string_len(Business::Phone, 64).not_null())
                    .col(string_len_null(Business::Website, 512))
                    .col(string_len(Business::Address, 512).not_null())
                    .col(text_null(Business::Description))
                    .col(string_len(Business::Image, 512).not_null())
                    .col(uuid(Business::OwnerId).not_null())
                    .col(uuid(Business::CategoryId).not_null())
                    .col(boolean(Business::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Business::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Business::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_owner")
                            .from(Business::Table, Business::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_category")
                            .from(Business::Table, Business::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Business::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Business {
    Table,
    Id,
    Name,
    Phone,
    Website,
    Address,
    Description,
    Image,
    OwnerId,
    CategoryId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
