//!
//! EyeSpy surveillance dashboard backend.
//! Reads configuration from TOML file (~/.config/eyespy/config.toml).

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use eyespy::auth::jwt::JwtConfig;
use eyespy::config::AppConfig;
use eyespy::infrastructure::database::migrator::Migrator;
use eyespy::{create_api_router, default_config_path, init_database, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EYESPY_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting EyeSpy surveillance dashboard server...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig::new(
        app_cfg.security.jwt_secret.clone(),
        app_cfg.security.jwt_expiration_hours,
    );
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Create default admin user if not exists; a failure here is logged
    // and the server keeps serving.
    create_default_admin(&db, &app_cfg).await;

    // Create REST API router
    let api_router = create_api_router(
        db.clone(),
        jwt_config,
        app_cfg.dashboard.system_uptime,
        Some(prometheus_handle),
    );

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("EyeSpy server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Create default admin user if no matching account exists
async fn create_default_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use eyespy::auth::hash_password;
    use eyespy::infrastructure::database::entities::user::{self, UserRole, UserStatus};
    use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&app_cfg.admin.username))
        .one(db)
        .await;

    match existing {
        Ok(Some(admin)) => {
            info!("Admin user already exists: {}", admin.username);
        }
        Ok(None) => {
            info!("No admin user found. Creating default admin user...");

            let password_hash = match hash_password(&app_cfg.admin.password) {
                Ok(hash) => hash,
                Err(e) => {
                    error!("Failed to hash admin password: {}", e);
                    return;
                }
            };

            let admin = user::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                name: Set(app_cfg.admin.name.clone()),
                username: Set(app_cfg.admin.username.clone()),
                email: Set(app_cfg.admin.email.clone()),
                password_hash: Set(password_hash),
                role: Set(UserRole::Administrator),
                status: Set(UserStatus::Active),
                created_at: Set(chrono::Utc::now()),
                last_login: Set(None),
            };

            match admin.insert(db).await {
                Ok(created) => {
                    info!("Default admin created: {}", created.email);
                    info!("Please change the admin password immediately!");
                }
                Err(e) => {
                    error!("Failed to create admin user: {}", e);
                }
            }
        }
        Err(e) => {
            error!("Database initialization error: {}", e);
        }
    }
}
