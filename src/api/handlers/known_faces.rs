//! Known faces API handlers
//!
//! These routes are reachable without authentication, matching the access
//! matrix the dashboard was shipped with.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::handlers::users::MessageResponse;
use crate::infrastructure::database::entities::known_face;
use crate::infrastructure::database::repositories::Collections;

/// State for known-face handlers
#[derive(Clone)]
pub struct KnownFacesHandlerState {
    pub collections: Collections,
}

/// Known face record
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnownFaceDto {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub date_added: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<known_face::Model> for KnownFaceDto {
    fn from(face: known_face::Model) -> Self {
        Self {
            id: face.id,
            name: face.name,
            image_url: face.image_url,
            date_added: face.date_added,
            last_seen: face.last_seen,
        }
    }
}

/// Add known face request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "name": "John Doe",
    "imageUrl": "https://example.com/faces/john.jpg"
}))]
pub struct CreateKnownFaceRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Update known face request (partial)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKnownFaceRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// List all known faces
#[utoipa::path(
    get,
    path = "/api/known-faces",
    tag = "Known Faces",
    responses(
        (status = 200, description = "List of known faces", body = Vec<KnownFaceDto>)
    )
)]
pub async fn list_known_faces(
    State(state): State<KnownFacesHandlerState>,
) -> Result<Json<Vec<KnownFaceDto>>, ApiError> {
    let faces = state.collections.known_faces.find_all().await?;
    Ok(Json(faces.into_iter().map(KnownFaceDto::from).collect()))
}

/// Add a new known face
#[utoipa::path(
    post,
    path = "/api/known-faces",
    tag = "Known Faces",
    request_body = CreateKnownFaceRequest,
    responses(
        (status = 201, description = "Known face created", body = KnownFaceDto),
        (status = 400, description = "Name or image URL missing")
    )
)]
pub async fn create_known_face(
    State(state): State<KnownFacesHandlerState>,
    Json(request): Json<CreateKnownFaceRequest>,
) -> Result<(StatusCode, Json<KnownFaceDto>), ApiError> {
    let (Some(name), Some(image_url)) = (request.name, request.image_url) else {
        return Err(ApiError::Validation(
            "Name and image URL are required".to_string(),
        ));
    };

    let new_face = known_face::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name),
        image_url: Set(image_url),
        date_added: Set(Utc::now()),
        last_seen: Set(None),
    };

    let created = state.collections.known_faces.insert(new_face).await?;

    Ok((StatusCode::CREATED, Json(KnownFaceDto::from(created))))
}

/// Update a known face
///
/// A request for an unknown id is acknowledged without effect.
#[utoipa::path(
    patch,
    path = "/api/known-faces/{id}",
    tag = "Known Faces",
    params(
        ("id" = String, Path, description = "Known face ID")
    ),
    request_body = UpdateKnownFaceRequest,
    responses(
        (status = 200, description = "Known face updated", body = MessageResponse)
    )
)]
pub async fn update_known_face(
    State(state): State<KnownFacesHandlerState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateKnownFaceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let has_updates = request.name.is_some() || request.image_url.is_some();
    if has_updates {
        if let Some(face) = state.collections.known_faces.find_by_id(id).await? {
            let mut active_face: known_face::ActiveModel = face.into();
            if let Some(name) = request.name {
                active_face.name = Set(name);
            }
            if let Some(image_url) = request.image_url {
                active_face.image_url = Set(image_url);
            }
            state.collections.known_faces.update(active_face).await?;
        }
    }

    Ok(Json(MessageResponse {
        message: "Face updated successfully".to_string(),
    }))
}

/// Delete a known face
///
/// A request for an unknown id is acknowledged without effect.
#[utoipa::path(
    delete,
    path = "/api/known-faces/{id}",
    tag = "Known Faces",
    params(
        ("id" = String, Path, description = "Known face ID")
    ),
    responses(
        (status = 200, description = "Known face deleted", body = MessageResponse)
    )
)]
pub async fn delete_known_face(
    State(state): State<KnownFacesHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.collections.known_faces.delete_by_id(id).await?;

    Ok(Json(MessageResponse {
        message: "Face deleted successfully".to_string(),
    }))
}
