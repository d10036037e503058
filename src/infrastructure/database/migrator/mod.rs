//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_known_faces;
mod m20250301_000003_create_system_settings;
mod m20250301_000004_create_scheduled_reports;
mod m20250301_000005_create_recognitions;
mod m20250301_000006_create_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_known_faces::Migration),
            Box::new(m20250301_000003_create_system_settings::Migration),
            Box::new(m20250301_000004_create_scheduled_reports::Migration),
            Box::new(m20250301_000005_create_recognitions::Migration),
            Box::new(m20250301_000006_create_alerts::Migration),
        ]
    }
}
