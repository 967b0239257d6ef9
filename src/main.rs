use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_admin_api::{
    app::build_router,
    config::{AppConfig, StorageBackend},
    db::{create_orm_conn, create_pool, run_migrations},
    repository::Repositories,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_admin_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let repos = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config.database_url()?;
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            let orm = create_orm_conn(database_url).await?;
            tracing::info!("using postgres storage");
            Repositories::postgres(orm, pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on exit");
            Repositories::in_memory()
        }
    };

    let state = AppState::new(repos, &config);
    let app = build_router(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
