//! Dashboard statistics API handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::infrastructure::database::entities::{alert, recognition};
use crate::infrastructure::database::repositories::Collections;

/// How many recent recognitions feed the activity list
const RECENT_RECOGNITIONS: u64 = 3;
/// How many recent alerts feed the activity list
const RECENT_ALERTS: u64 = 2;
/// Maximum length of the merged activity list
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// State for stats handlers
#[derive(Clone)]
pub struct StatsHandlerState {
    pub collections: Collections,
    /// Fixed uptime percentage reported on the dashboard
    pub system_uptime: f64,
}

/// One entry in the recent-activity feed
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntry {
    /// `recognition` or `alert`
    #[serde(rename = "type")]
    pub entry_type: String,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Dashboard summary response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_recognized: u64,
    pub alert_triggers: u64,
    /// Placeholder constant, not a measured value
    pub system_uptime: f64,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Get dashboard statistics
///
/// Counts both event collections and merges the most recent recognitions
/// and alerts into a single feed ordered newest first.
#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    tag = "Stats",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_dashboard_stats(
    State(state): State<StatsHandlerState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let total_recognized = state.collections.recognitions.count().await?;
    let alert_triggers = state.collections.alerts.count().await?;

    let recent_recognitions = state
        .collections
        .recognitions
        .find_recent(recognition::Column::Timestamp, RECENT_RECOGNITIONS)
        .await?;

    let recent_alerts = state
        .collections
        .alerts
        .find_recent(alert::Column::Timestamp, RECENT_ALERTS)
        .await?;

    // Combine, re-sort newest first and truncate
    let mut recent_activity: Vec<ActivityEntry> = recent_recognitions
        .into_iter()
        .map(|rec| ActivityEntry {
            entry_type: "recognition".to_string(),
            message: format!("Person recognized: {}", rec.person_name),
            location: rec.location,
            timestamp: rec.timestamp,
        })
        .chain(recent_alerts.into_iter().map(|alert| ActivityEntry {
            entry_type: "alert".to_string(),
            message: alert.message,
            location: alert.location,
            timestamp: alert.timestamp,
        }))
        .collect();

    recent_activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

    Ok(Json(DashboardSummary {
        total_recognized,
        alert_triggers,
        system_uptime: state.system_uptime,
        recent_activity,
    }))
}
