//! Create `profession` table. Specialties are stored denormalised as a
//! comma-joined list.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profession::Table)
                    .if_not_exists()
                    .col(uuid(Profession::Id).primary_key())
                    .col(string_len(Profession::Name, 255).not_null())
                    .col(string_len(Profession::ProfessionType, 32).not_null().default("other"))
                    .col(text_null(Profession::Biography))
                    .col(string_len_null(Profession::Location, 255))
                    .col(string_len_null(Profession::Contact, 255))
                    .col(text_null(Profession::Specialties))
                    .col(string_len_null(Profession::Image, 512))
                    .col(uuid(Profession::UserId).not_null())
                    .col(boolean(Profession::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Profession::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Profession::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profession_user")
                            .from(Profession::Table, Profession::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profession::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profession {
    Table,
    Id,
    Name,
    ProfessionType,
    Biography,
    Location,
    Contact,
    Specialties,
    Image,
    UserId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
