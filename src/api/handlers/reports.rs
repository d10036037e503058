//! Scheduled reports API handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::handlers::users::MessageResponse;
use crate::infrastructure::database::entities::scheduled_report;
use crate::infrastructure::database::repositories::Collections;

/// State for report handlers
#[derive(Clone)]
pub struct ReportsHandlerState {
    pub collections: Collections,
}

/// Scheduled report record
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReportDto {
    pub id: String,
    pub title: String,
    pub frequency: String,
    pub day: String,
    pub time: String,
    pub recipients: String,
    pub format: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<scheduled_report::Model> for ScheduledReportDto {
    fn from(report: scheduled_report::Model) -> Self {
        Self {
            id: report.id,
            title: report.title,
            frequency: report.frequency,
            day: report.day,
            time: report.time,
            recipients: report.recipients,
            format: report.format,
            active: report.active,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Create-or-update request for a scheduled report.
///
/// With an `id` the matching report is updated (unknown ids are
/// acknowledged without effect); without one a new report is created.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "title": "Weekly recognition summary",
    "frequency": "weekly",
    "day": "Monday",
    "time": "08:00",
    "recipients": "security@example.com",
    "format": "pdf",
    "active": true
}))]
pub struct SaveScheduledReportRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub frequency: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub recipients: Option<String>,
    pub format: Option<String>,
    pub active: Option<bool>,
}

/// Ad-hoc report generation request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: Option<String>,
    /// Accepted for interface compatibility; the generator does not filter
    /// by range yet.
    #[allow(dead_code)]
    pub date_range: Option<serde_json::Value>,
}

/// Ad-hoc report generation response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReportResponse {
    pub message: String,
    pub download_url: String,
}

/// List scheduled reports
#[utoipa::path(
    get,
    path = "/api/reports/scheduled",
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "List of scheduled reports", body = Vec<ScheduledReportDto>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_scheduled_reports(
    State(state): State<ReportsHandlerState>,
) -> Result<Json<Vec<ScheduledReportDto>>, ApiError> {
    let reports = state.collections.reports.find_all().await?;
    Ok(Json(
        reports.into_iter().map(ScheduledReportDto::from).collect(),
    ))
}

/// Create or update a scheduled report
#[utoipa::path(
    post,
    path = "/api/reports/scheduled",
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    ),
    request_body = SaveScheduledReportRequest,
    responses(
        (status = 200, description = "Report schedule saved", body = MessageResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn save_scheduled_report(
    State(state): State<ReportsHandlerState>,
    Json(request): Json<SaveScheduledReportRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let now = Utc::now();

    if let Some(id) = request.id {
        // Update existing; an unknown id is acknowledged without effect.
        if let Some(report) = state.collections.reports.find_by_id(id).await? {
            let mut active_report: scheduled_report::ActiveModel = report.into();
            if let Some(title) = request.title {
                active_report.title = Set(title);
            }
            if let Some(frequency) = request.frequency {
                active_report.frequency = Set(frequency);
            }
            if let Some(day) = request.day {
                active_report.day = Set(day);
            }
            if let Some(time) = request.time {
                active_report.time = Set(time);
            }
            if let Some(recipients) = request.recipients {
                active_report.recipients = Set(recipients);
            }
            if let Some(format) = request.format {
                active_report.format = Set(format);
            }
            if let Some(active) = request.active {
                active_report.active = Set(active);
            }
            active_report.updated_at = Set(now);
            state.collections.reports.update(active_report).await?;
        }
    } else {
        let new_report = scheduled_report::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(request.title.unwrap_or_default()),
            frequency: Set(request.frequency.unwrap_or_default()),
            day: Set(request.day.unwrap_or_default()),
            time: Set(request.time.unwrap_or_default()),
            recipients: Set(request.recipients.unwrap_or_default()),
            format: Set(request.format.unwrap_or_default()),
            active: Set(request.active.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        state.collections.reports.insert(new_report).await?;
    }

    Ok(Json(MessageResponse {
        message: "Report schedule saved successfully".to_string(),
    }))
}

/// Generate an ad-hoc report
///
/// Returns a download URL immediately; no report file is produced by the
/// backend.
#[utoipa::path(
    post,
    path = "/api/reports/generate",
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    ),
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report generated", body = GeneratedReportResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn generate_report(
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GeneratedReportResponse>, ApiError> {
    let report_type = request.report_type.unwrap_or_else(|| "report".to_string());

    Ok(Json(GeneratedReportResponse {
        message: "Report generated successfully".to_string(),
        download_url: format!("/reports/{}_{}.pdf", report_type, Utc::now().timestamp_millis()),
    }))
}
