use anyhow::Result;
use mokkan_press::application::{
    background::BackgroundTasks,
    context::CallContext,
    ports::{ArticleCachePort, ClockPort, IdGeneratorPort},
    repository::ArticleRepository,
    services::ApplicationServices,
};
use mokkan_press::config::AppConfig;
use mokkan_press::infrastructure::{
    cache::RedisArticleCache,
    clock::SystemClock,
    database,
    id::PostgresSequenceIdGenerator,
    repositories::{
        PostgresArticleSyncCoordinator, PostgresDraftArticleStore, PostgresLiveArticleStore,
    },
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url(), config.database_max_connections()).await?;
    database::run_migrations(&pool).await?;
    tracing::info!("database migrations applied");

    let ids: Arc<IdGeneratorPort> = Arc::new(PostgresSequenceIdGenerator::new(pool.clone()));
    let clock: Arc<ClockPort> = Arc::new(SystemClock);

    let redis = RedisArticleCache::from_url(config.redis_url(), config.cache_ttl())?;
    let ctx = CallContext::with_timeout(config.store_timeout());
    match ctx.bound(redis.ping()).await {
        Ok(Ok(())) => tracing::info!("redis reachable"),
        Ok(Err(err)) => tracing::warn!(error = %err, "redis ping failed; reads fall through to postgres"),
        Err(err) => tracing::warn!(error = %err, "redis ping timed out; reads fall through to postgres"),
    }
    let cache: Arc<ArticleCachePort> = Arc::new(redis);

    let repository = Arc::new(ArticleRepository::new(
        Arc::new(PostgresDraftArticleStore::new(
            pool.clone(),
            Arc::clone(&ids),
            Arc::clone(&clock),
        )),
        Arc::new(PostgresLiveArticleStore::new(pool.clone())),
        Arc::new(PostgresArticleSyncCoordinator::new(
            pool.clone(),
            Arc::clone(&ids),
            Arc::clone(&clock),
        )),
        cache,
        BackgroundTasks::new(config.cache_task_timeout()),
    ));
    let services = ApplicationServices::new(repository);

    tracing::info!(
        max_connections = config.database_max_connections(),
        cache_task_timeout_ms = config.cache_task_timeout().as_millis(),
        "article store ready"
    );

    services.background_tasks().drain().await;
    pool.close().await;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}
