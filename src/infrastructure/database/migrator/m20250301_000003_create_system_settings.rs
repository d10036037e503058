//! Migration to create system_settings table
//!
//! The table is a singleton keyed by the fixed `type` discriminator; the
//! nested sections live in JSON columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Type)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemSettings::General).json().not_null())
                    .col(ColumnDef::new(SystemSettings::Security).json().not_null())
                    .col(ColumnDef::new(SystemSettings::Alerts).json().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SystemSettings {
    Table,
    Type,
    General,
    Security,
    Alerts,
}
