//! Migration to create recognitions table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recognitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recognitions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recognitions::PersonName).string_len(255).not_null())
                    .col(ColumnDef::new(Recognitions::Location).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Recognitions::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recognitions_timestamp")
                    .table(Recognitions::Table)
                    .col(Recognitions::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recognitions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Recognitions {
    Table,
    Id,
    PersonName,
    Location,
    Timestamp,
}
