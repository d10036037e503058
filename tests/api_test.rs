//! Integration tests driving the API router against in-memory SQLite.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use eyespy::auth::jwt::JwtConfig;
use eyespy::auth::{create_token, hash_password, verify_token};
use eyespy::create_api_router;
use eyespy::infrastructure::database::entities::user::{UserRole, UserStatus};
use eyespy::infrastructure::database::entities::{alert, recognition, user};
use eyespy::infrastructure::database::migrator::Migrator;

const JWT_SECRET: &str = "test-secret";

fn jwt_config() -> JwtConfig {
    JwtConfig::new(JWT_SECRET, 24)
}

/// Helper: spin up in-memory DB, run migrations, seed the admin account
/// and build the router.
async fn setup() -> (Router, DatabaseConnection) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    seed_user(&db, "Admin User", "admin", "admin123", UserRole::Administrator).await;

    let router = create_api_router(db.clone(), jwt_config(), 99.8, None);
    (router, db)
}

async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    username: &str,
    password: &str,
    role: UserRole,
) -> user::Model {
    let model = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(hash_password(password).unwrap()),
        role: Set(role),
        status: Set(UserStatus::Active),
        created_at: Set(Utc::now()),
        last_login: Set(None),
    };
    model.insert(db).await.unwrap()
}

fn req(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_token(router: &Router, username: &str, password: &str) -> String {
    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_embeds_stored_role_in_token() {
    let (router, db) = setup().await;
    seed_user(&db, "Op", "operator1", "op-pass", UserRole::Operator).await;

    let token = login_token(&router, "operator1", "op-pass").await;
    let claims = verify_token(&token, &jwt_config()).unwrap();
    assert_eq!(claims.role, "Operator");
    assert_eq!(claims.username, "operator1");

    let admin_token = login_token(&router, "admin", "admin123").await;
    let claims = verify_token(&admin_token, &jwt_config()).unwrap();
    assert_eq!(claims.role, "Administrator");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (router, _db) = setup().await;

    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");

    let response = router
        .oneshot(req(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "whatever" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_updates_last_login() {
    let (router, db) = setup().await;
    let seeded = seed_user(&db, "Op", "operator1", "op-pass", UserRole::Operator).await;
    assert!(seeded.last_login.is_none());

    login_token(&router, "operator1", "op-pass").await;

    let refreshed = user::Entity::find_by_id(seeded.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.last_login.is_some());
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (router, _db) = setup().await;

    // Valid signature, expiry two hours in the past.
    let expired_config = JwtConfig::new(JWT_SECRET, -2);
    let token = create_token("some-id", "admin", "Administrator", &expired_config).unwrap();

    let response = router
        .oneshot(req("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_not_found_after_user_deleted() {
    let (router, db) = setup().await;
    let temp = seed_user(&db, "Temp", "temp1", "temp-pass", UserRole::Viewer).await;

    let token = login_token(&router, "temp1", "temp-pass").await;

    user::Entity::delete_by_id(temp.id).exec(&db).await.unwrap();

    let response = router
        .oneshot(req("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn me_returns_current_user() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .oneshot(req("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "Administrator");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn known_face_requires_name_and_image_url() {
    let (router, _db) = setup().await;

    let response = router
        .oneshot(req(
            "POST",
            "/api/known-faces",
            None,
            Some(json!({ "name": "John Doe" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Name and image URL are required");
}

#[tokio::test]
async fn known_face_round_trips_through_list() {
    let (router, _db) = setup().await;

    // Public routes: no token on purpose.
    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/known-faces",
            None,
            Some(json!({
                "name": "John Doe",
                "imageUrl": "https://example.com/faces/john.jpg"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "John Doe");
    assert_eq!(created["imageUrl"], "https://example.com/faces/john.jpg");
    assert!(created["lastSeen"].is_null());

    let response = router
        .oneshot(req("GET", "/api/known-faces", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    let found = list.iter().find(|f| f["id"] == id.as_str()).unwrap();
    assert_eq!(found["name"], "John Doe");
    assert_eq!(found["imageUrl"], "https://example.com/faces/john.jpg");
}

#[tokio::test]
async fn known_face_update_and_delete_are_silent_on_unknown_id() {
    let (router, _db) = setup().await;

    let response = router
        .clone()
        .oneshot(req(
            "PATCH",
            "/api/known-faces/no-such-id",
            None,
            Some(json!({ "name": "Ghost" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Face updated successfully");

    let response = router
        .oneshot(req("DELETE", "/api/known-faces/no-such-id", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Face deleted successfully");
}

#[tokio::test]
async fn known_face_update_applies_partial_fields() {
    let (router, _db) = setup().await;

    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/known-faces",
            None,
            Some(json!({ "name": "Jane", "imageUrl": "https://example.com/a.jpg" })),
        ))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(req(
            "PATCH",
            &format!("/api/known-faces/{}", id),
            None,
            Some(json!({ "name": "Jane Updated" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(req("GET", "/api/known-faces", None, None))
        .await
        .unwrap();
    let list = body_json(response).await;
    let found = list
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == id.as_str())
        .unwrap()
        .clone();
    assert_eq!(found["name"], "Jane Updated");
    // Image URL untouched by the partial update.
    assert_eq!(found["imageUrl"], "https://example.com/a.jpg");
}

#[tokio::test]
async fn settings_lazy_create_is_idempotent() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let first = body_json(
        router
            .clone()
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        router
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(first["type"], "system");
    assert_eq!(first["general"]["systemName"], "EyeSpy Surveillance System");
    assert_eq!(first["security"]["twoFactorEnabled"], false);
    assert_eq!(first["security"]["apiKey"].as_str().unwrap().len(), 13);
    assert_eq!(first["alerts"]["alertCategories"]["restrictedPerson"], true);
    assert_eq!(first["alerts"]["alertCategories"]["unknownPerson"], true);
    assert_eq!(first["alerts"]["alertCategories"]["systemErrors"], true);
}

#[tokio::test]
async fn regenerate_api_key_changes_only_security_api_key() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let before = body_json(
        router
            .clone()
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;

    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/settings/regenerate-api-key",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let regenerated = body_json(response).await;
    let new_key = regenerated["apiKey"].as_str().unwrap().to_string();

    let after = body_json(
        router
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(after["security"]["apiKey"], new_key.as_str());
    assert_ne!(after["security"]["apiKey"], before["security"]["apiKey"]);
    assert_eq!(
        after["security"]["twoFactorEnabled"],
        before["security"]["twoFactorEnabled"]
    );
    assert_eq!(after["general"], before["general"]);
    assert_eq!(after["alerts"], before["alerts"]);
}

#[tokio::test]
async fn update_settings_replaces_one_section() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let before = body_json(
        router
            .clone()
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;

    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/settings",
            Some(&token),
            Some(json!({
                "section": "alerts",
                "settings": {
                    "emailNotifications": "ops@example.com",
                    "alertCategories": {
                        "restrictedPerson": true,
                        "unknownPerson": false,
                        "systemErrors": true
                    }
                }
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Settings updated successfully");

    let after = body_json(
        router
            .oneshot(req("GET", "/api/settings", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(after["alerts"]["emailNotifications"], "ops@example.com");
    assert_eq!(after["alerts"]["alertCategories"]["unknownPerson"], false);
    // Other sections untouched.
    assert_eq!(after["general"], before["general"]);
    assert_eq!(after["security"], before["security"]);
}

#[tokio::test]
async fn update_settings_requires_section_and_payload() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .oneshot(req(
            "POST",
            "/api/settings",
            Some(&token),
            Some(json!({ "section": "alerts" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Section and settings are required");
}

#[tokio::test]
async fn create_user_then_duplicate_username() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let payload = json!({
        "name": "A",
        "username": "a1",
        "email": "a@x.com",
        "password": "p",
        "role": "Viewer",
        "status": "Active"
    });

    let response = router
        .clone()
        .oneshot(req("POST", "/api/users", Some(&token), Some(payload.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["username"], "a1");
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());

    let response = router
        .oneshot(req("POST", "/api/users", Some(&token), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn create_user_requires_all_fields() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .oneshot(req(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({ "name": "A", "username": "a1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn user_routes_enforce_admin_role() {
    let (router, db) = setup().await;
    seed_user(&db, "Viewer", "viewer1", "view-pass", UserRole::Viewer).await;

    // No token at all.
    let response = router
        .clone()
        .oneshot(req("GET", "/api/users", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token, wrong role.
    let viewer_token = login_token(&router, "viewer1", "view-pass").await;
    let response = router
        .clone()
        .oneshot(req("GET", "/api/users", Some(&viewer_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Access denied. Not an administrator.");

    // Settings mutation is admin-only as well.
    let response = router
        .oneshot(req(
            "POST",
            "/api/settings/regenerate-api-key",
            Some(&viewer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_list_hides_password_and_renders_never() {
    let (router, db) = setup().await;
    seed_user(&db, "Op", "operator1", "op-pass", UserRole::Operator).await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .oneshot(req("GET", "/api/users", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);

    let operator = list.iter().find(|u| u["username"] == "operator1").unwrap();
    assert_eq!(operator["lastLogin"], "Never");
    assert!(operator.get("passwordHash").is_none());

    // The admin logged in above, so its lastLogin is a real timestamp.
    let admin = list.iter().find(|u| u["username"] == "admin").unwrap();
    assert_ne!(admin["lastLogin"], "Never");
}

#[tokio::test]
async fn delete_user_returns_not_found_for_unknown_id() {
    let (router, db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .clone()
        .oneshot(req("DELETE", "/api/users/no-such-id", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let victim = seed_user(&db, "Gone", "gone1", "gone-pass", UserRole::Viewer).await;
    let response = router
        .oneshot(req(
            "DELETE",
            &format!("/api/users/{}", victim.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User deleted successfully");
}

#[tokio::test]
async fn scheduled_reports_upsert_and_list() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/reports/scheduled",
            Some(&token),
            Some(json!({
                "title": "Weekly recognition summary",
                "frequency": "weekly",
                "day": "Monday",
                "time": "08:00",
                "recipients": "security@example.com",
                "format": "pdf",
                "active": true
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Report schedule saved successfully");

    let list = body_json(
        router
            .clone()
            .oneshot(req("GET", "/api/reports/scheduled", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    let report = &list[0];
    assert_eq!(report["title"], "Weekly recognition summary");
    assert_eq!(report["active"], true);
    let id = report["id"].as_str().unwrap().to_string();

    // Update through the same endpoint, keyed by id.
    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/reports/scheduled",
            Some(&token),
            Some(json!({ "id": id, "active": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(
        router
            .clone()
            .oneshot(req("GET", "/api/reports/scheduled", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["active"], false);
    assert_eq!(list[0]["title"], "Weekly recognition summary");

    // Unknown id is acknowledged without creating anything.
    let response = router
        .clone()
        .oneshot(req(
            "POST",
            "/api/reports/scheduled",
            Some(&token),
            Some(json!({ "id": "no-such-id", "title": "Ghost" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(
        router
            .oneshot(req("GET", "/api/reports/scheduled", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn generate_report_returns_download_url() {
    let (router, _db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    let response = router
        .oneshot(req(
            "POST",
            "/api/reports/generate",
            Some(&token),
            Some(json!({ "reportType": "daily", "dateRange": { "from": "2026-08-01" } })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Report generated successfully");
    let url = body["downloadUrl"].as_str().unwrap();
    assert!(url.starts_with("/reports/daily_"));
    assert!(url.ends_with(".pdf"));
}

#[tokio::test]
async fn dashboard_merges_recent_activity_newest_first() {
    let (router, db) = setup().await;
    let token = login_token(&router, "admin", "admin123").await;

    for (name, location, secs) in [("Alice", "Lobby", 10), ("Bob", "Gate", 20)] {
        recognition::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            person_name: Set(name.to_string()),
            location: Set(location.to_string()),
            timestamp: Set(Utc.timestamp_opt(secs, 0).unwrap()),
        }
        .insert(&db)
        .await
        .unwrap();
    }
    alert::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        message: Set("Unknown person detected".to_string()),
        location: Set("Parking".to_string()),
        timestamp: Set(Utc.timestamp_opt(15, 0).unwrap()),
    }
    .insert(&db)
    .await
    .unwrap();

    let response = router
        .oneshot(req("GET", "/api/stats/dashboard", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["totalRecognized"], 2);
    assert_eq!(body["alertTriggers"], 1);
    assert_eq!(body["systemUptime"], 99.8);

    let activity = body["recentActivity"].as_array().unwrap();
    assert_eq!(activity.len(), 3);

    let timestamps: Vec<i64> = activity
        .iter()
        .map(|e| {
            DateTime::parse_from_rfc3339(e["timestamp"].as_str().unwrap())
                .unwrap()
                .timestamp()
        })
        .collect();
    assert_eq!(timestamps, vec![20, 15, 10]);

    assert_eq!(activity[0]["type"], "recognition");
    assert_eq!(activity[0]["message"], "Person recognized: Bob");
    assert_eq!(activity[1]["type"], "alert");
    assert_eq!(activity[1]["message"], "Unknown person detected");
    assert_eq!(activity[2]["type"], "recognition");
    assert_eq!(activity[2]["message"], "Person recognized: Alice");
}

#[tokio::test]
async fn dashboard_requires_token() {
    let (router, _db) = setup().await;

    let response = router
        .oneshot(req("GET", "/api/stats/dashboard", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn health_is_public() {
    let (router, _db) = setup().await;

    let response = router
        .oneshot(req("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
