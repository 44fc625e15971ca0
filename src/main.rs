use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelrank_api::{
    config::Config,
    create_router,
    db::{create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle},
    services::{
        catalog::{read_seed_file, CatalogLookup, InMemoryCatalog, PgCatalog},
        preferences::{InMemoryPreferenceStore, PreferenceStore, RedisPreferenceStore},
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Redis backs both preference profiles and the top-rated cache
    let (store, cache): (Arc<dyn PreferenceStore>, Option<(Cache, CacheWriterHandle)>) =
        match config.redis_url.as_deref() {
            Some(url) => {
                let client = create_redis_client(url)?;
                let cache = Cache::new(client.clone()).await;
                tracing::info!("Preference profiles stored in Redis");
                (
                    Arc::new(RedisPreferenceStore::new(client)) as Arc<dyn PreferenceStore>,
                    Some(cache),
                )
            }
            None => {
                tracing::warn!("REDIS_URL not set, preference profiles kept in memory");
                (
                    Arc::new(InMemoryPreferenceStore::new()) as Arc<dyn PreferenceStore>,
                    None,
                )
            }
        };

    let (catalog, cache_writer): (Arc<dyn CatalogLookup>, Option<CacheWriterHandle>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = create_pool(url).await?;
                run_migrations(&pool).await?;
                let catalog = PgCatalog::new(pool);
                if catalog.count().await? == 0 {
                    let movies = read_seed_file(&config.catalog_seed_path).await?;
                    catalog.seed(&movies).await?;
                }
                match cache {
                    Some((cache, handle)) => (
                        Arc::new(catalog.with_cache(cache, config.top_rated_cache_ttl))
                            as Arc<dyn CatalogLookup>,
                        Some(handle),
                    ),
                    None => (Arc::new(catalog) as Arc<dyn CatalogLookup>, None),
                }
            }
            None => {
                let catalog = InMemoryCatalog::from_seed_file(&config.catalog_seed_path).await?;
                (
                    Arc::new(catalog) as Arc<dyn CatalogLookup>,
                    cache.map(|(_, handle)| handle),
                )
            }
        };

    let app = create_router(AppState::new(catalog, store));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
