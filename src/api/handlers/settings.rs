//! System settings API handlers
//!
//! The settings collection is a singleton document materialized lazily on
//! first read. Mutation is per-section; the regenerate endpoint rewrites
//! only the nested API key.

use axum::{extract::State, Extension, Json};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::auth::generate_api_key;
use crate::auth::middleware::AuthenticatedUser;
use crate::infrastructure::database::entities::system_settings::{
    self, AlertCategories, AlertsSection, GeneralSection, SecuritySection, SETTINGS_KEY,
};
use crate::infrastructure::database::repositories::Collections;

/// State for settings handlers
#[derive(Clone)]
pub struct SettingsHandlerState {
    pub collections: Collections,
}

/// Update settings request: replaces exactly one named section
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "section": "alerts",
    "settings": {
        "emailNotifications": "ops@example.com",
        "alertCategories": {
            "restrictedPerson": true,
            "unknownPerson": false,
            "systemErrors": true
        }
    }
}))]
pub struct UpdateSettingsRequest {
    /// Section name: `general`, `security` or `alerts`
    pub section: Option<String>,
    /// New contents for the section
    pub settings: Option<serde_json::Value>,
}

/// Acknowledgement response
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsSavedResponse {
    pub message: String,
}

/// API key regeneration response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratedApiKeyResponse {
    pub message: String,
    pub api_key: String,
}

/// Fetch the singleton settings document, creating it with defaults when
/// it does not exist yet.
async fn get_or_create_settings(
    collections: &Collections,
) -> Result<system_settings::Model, ApiError> {
    if let Some(settings) = collections
        .settings
        .find_by_id(SETTINGS_KEY.to_string())
        .await?
    {
        return Ok(settings);
    }

    info!("No system settings found, creating defaults");

    let defaults = system_settings::ActiveModel {
        kind: Set(SETTINGS_KEY.to_string()),
        general: Set(GeneralSection {
            system_name: "EyeSpy Surveillance System".to_string(),
        }),
        security: Set(SecuritySection {
            api_key: generate_api_key(),
            two_factor_enabled: false,
        }),
        alerts: Set(AlertsSection {
            email_notifications: String::new(),
            alert_categories: AlertCategories {
                restricted_person: true,
                unknown_person: true,
                system_errors: true,
            },
        }),
    };

    Ok(collections.settings.insert(defaults).await?)
}

/// Get system settings
///
/// Materializes the default document on first read and returns the same
/// document on every subsequent call.
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "System settings document"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_settings(
    State(state): State<SettingsHandlerState>,
) -> Result<Json<system_settings::Model>, ApiError> {
    let settings = get_or_create_settings(&state.collections).await?;
    Ok(Json(settings))
}

/// Update one settings section
#[utoipa::path(
    post,
    path = "/api/settings",
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SettingsSavedResponse),
        (status = 400, description = "Missing section or settings payload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn update_settings(
    State(state): State<SettingsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsSavedResponse>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let (Some(section), Some(settings)) = (request.section, request.settings) else {
        return Err(ApiError::Validation(
            "Section and settings are required".to_string(),
        ));
    };

    let current = get_or_create_settings(&state.collections).await?;
    let mut active: system_settings::ActiveModel = current.into();

    match section.as_str() {
        "general" => {
            let parsed: GeneralSection = serde_json::from_value(settings)
                .map_err(|_| ApiError::Validation("Invalid settings payload".to_string()))?;
            active.general = Set(parsed);
        }
        "security" => {
            let parsed: SecuritySection = serde_json::from_value(settings)
                .map_err(|_| ApiError::Validation("Invalid settings payload".to_string()))?;
            active.security = Set(parsed);
        }
        "alerts" => {
            let parsed: AlertsSection = serde_json::from_value(settings)
                .map_err(|_| ApiError::Validation("Invalid settings payload".to_string()))?;
            active.alerts = Set(parsed);
        }
        _ => {
            return Err(ApiError::Validation(
                "Unknown settings section".to_string(),
            ));
        }
    }

    state.collections.settings.update(active).await?;
    info!("Settings section '{}' updated", section);

    Ok(Json(SettingsSavedResponse {
        message: "Settings updated successfully".to_string(),
    }))
}

/// Regenerate the API key
///
/// Overwrites only the nested `security.apiKey` field; all other settings
/// are left untouched.
#[utoipa::path(
    post,
    path = "/api/settings/regenerate-api-key",
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "New API key", body = RegeneratedApiKeyResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn regenerate_api_key(
    State(state): State<SettingsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<RegeneratedApiKeyResponse>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let current = get_or_create_settings(&state.collections).await?;

    let new_api_key = generate_api_key();
    let mut security = current.security.clone();
    security.api_key = new_api_key.clone();

    let mut active: system_settings::ActiveModel = current.into();
    active.security = Set(security);
    state.collections.settings.update(active).await?;

    info!("API key regenerated");

    Ok(Json(RegeneratedApiKeyResponse {
        message: "API key regenerated successfully".to_string(),
        api_key: new_api_key,
    }))
}
