use books_service::config::{BackendConfig, Config};
use books_service::models::storage::{MemoryBackend, PostgresBackend, StorageBackend};
use books_service::{app, AppState, Backend};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("books_service=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let backend: Backend = match &config.backend {
        BackendConfig::Postgres {
            database_url,
            max_connections,
            acquire_timeout,
        } => {
            info!("Using PostgreSQL backend");
            let postgres_backend =
                PostgresBackend::new(database_url, *max_connections, *acquire_timeout).await?;

            Arc::new(postgres_backend)
        }
        BackendConfig::Memory { books_file } => {
            info!("Using in-memory backend seeded from {}", books_file.display());
            let memory_backend = MemoryBackend::from_json_file(books_file)?;
            info!("Loaded {} books", memory_backend.len());

            Arc::new(memory_backend)
        }
    };

    if let Err(e) = backend.test_connection().await {
        error!("Failed to connect to storage backend: {}", e);
        std::process::exit(1);
    }
    info!("Storage backend connection successful");

    let state = AppState::new(backend).with_public_base_url(config.public_base_url.clone());
    let app = app(state, config.request_timeout);

    let addr = config.bind_addr();
    info!("Books service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
