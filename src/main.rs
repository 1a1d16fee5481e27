//! Pet store API server: loads config from env (and `.env`), prepares storage,
//! mounts the routes and serves.

use pet_store_api::{
    app, ensure_database_exists, ensure_schema, AppConfig, AppState, MemoryRepository,
    PetStoreService, PgRepository, Repository, StorageKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pet_store_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let repo: Arc<dyn Repository> = match config.storage {
        StorageKind::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_schema(&pool, &config.schema).await?;
            Arc::new(PgRepository::new(pool, &config.schema))
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryRepository::new())
        }
    };

    let service = PetStoreService::new(repo, config.delete_policy);
    let router = app(AppState::new(service));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        delete_policy = ?config.delete_policy,
        storage = ?config.storage,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, router).await?;
    Ok(())
}
