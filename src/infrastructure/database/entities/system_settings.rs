//! System settings singleton entity
//!
//! The collection holds exactly one document, keyed by the fixed
//! discriminator `type = "system"`. The nested sections are stored as JSON
//! columns and surfaced to the API unchanged.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Discriminator value of the singleton document
pub const SETTINGS_KEY: &str = "system";

/// General settings section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSection {
    pub system_name: String,
}

/// Security settings section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySection {
    pub api_key: String,
    pub two_factor_enabled: bool,
}

/// Alert notification settings section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct AlertsSection {
    pub email_notifications: String,
    pub alert_categories: AlertCategories,
}

/// Alert category toggles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct AlertCategories {
    pub restricted_person: bool,
    pub unknown_person: bool,
    pub system_errors: bool,
}

/// System settings model (singleton)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    #[sea_orm(column_type = "Json")]
    pub general: GeneralSection,
    #[sea_orm(column_type = "Json")]
    pub security: SecuritySection,
    #[sea_orm(column_type = "Json")]
    pub alerts: AlertsSection,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
