//! Hogar API server.
//!
//! Main entry point for the household finance backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hogar_api::{AppState, create_router};
use hogar_core::storage::{StorageConfig, StorageService};
use hogar_db::connect_with_pool;
use hogar_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hogar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is too large")?,
        refresh_token_expires_secs: i64::try_from(config.jwt.refresh_token_expiry_secs)
            .context("jwt.refresh_token_expiry_secs is too large")?,
    });

    let storage = match &config.storage {
        Some(settings) => {
            let storage_config =
                StorageConfig::from_settings(settings).context("Invalid storage configuration")?;
            info!(
                provider = %settings.provider,
                bucket = storage_config.provider.bucket(),
                "Receipt storage configured"
            );
            Some(Arc::new(
                StorageService::from_config(storage_config)
                    .context("Failed to open receipt storage")?,
            ))
        }
        None => {
            warn!("No storage section configured; receipt uploads are disabled");
            None
        }
    };

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
