use intellsys_portal::{
    AppState, Database, HostedClients, StoreRepository,
    config::{AppConfig, Env},
    create_router,
    repository::RepositoryState,
    storage::{S3StorageClient, StorageService, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the process-wide SQL pool, hosted
/// clients and object store client once, and serves the router.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "intellsys_portal=debug,tower_http=info".into());

    // Pretty output for humans locally, JSON for the log pipeline in production.
    match config.env {
        Env::Local => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        Env::Production => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let db = Database::connect(&config).await?;
    tracing::info!(ssl_relaxed = config.db_ssl_relaxed, "Postgres pool ready");

    let hosted = HostedClients::new(&config);
    let repo = Arc::new(StoreRepository::new(db, hosted)) as RepositoryState;

    let s3_client = S3StorageClient::new(
        config.s3_endpoint.as_deref(),
        &config.s3_region,
        &config.s3_key,
        &config.s3_secret,
        &config.s3_bucket,
    );

    // Local MinIO starts empty; production buckets are provisioned outside the app.
    if config.env == Env::Local {
        s3_client.ensure_bucket_exists().await;
    }
    let storage = Arc::new(s3_client) as StorageState;

    let address = format!("0.0.0.0:{}", config.port);
    let app = create_router(AppState {
        repo,
        storage,
        config,
    });

    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on {address}");
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await?;
    Ok(())
}
