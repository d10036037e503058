//! Migration to create scheduled_reports table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduledReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledReports::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScheduledReports::Title).string_len(255).not_null())
                    .col(ColumnDef::new(ScheduledReports::Frequency).string_len(32).not_null())
                    .col(ColumnDef::new(ScheduledReports::Day).string_len(32).not_null())
                    .col(ColumnDef::new(ScheduledReports::Time).string_len(16).not_null())
                    .col(ColumnDef::new(ScheduledReports::Recipients).string().not_null())
                    .col(ColumnDef::new(ScheduledReports::Format).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ScheduledReports::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduledReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledReports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledReports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ScheduledReports {
    Table,
    Id,
    Title,
    Frequency,
    Day,
    Time,
    Recipients,
    Format,
    Active,
    CreatedAt,
    UpdatedAt,
}
