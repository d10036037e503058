//! Migration to create known_faces table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KnownFaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KnownFaces::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(KnownFaces::Name).string_len(255).not_null())
                    .col(ColumnDef::new(KnownFaces::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(KnownFaces::DateAdded)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KnownFaces::LastSeen)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KnownFaces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum KnownFaces {
    Table,
    Id,
    Name,
    ImageUrl,
    DateAdded,
    LastSeen,
}
