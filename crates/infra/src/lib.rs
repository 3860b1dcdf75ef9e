mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IEventRepo, INotificationRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct EventHubContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub search_index: SearchIndexSync,
}

impl EventHubContext {
    /// Must be called from within a tokio runtime as it starts the search index workers
    pub fn new(repos: Repos, config: Config, index: Arc<dyn ISearchIndex>) -> Self {
        let search_index = SearchIndexSync::start(
            index,
            config.search_index_workers,
            config.search_index_queue_capacity,
        );
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            search_index,
        }
    }

    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(url) => Repos::create_postgres(url, config.timezone).await?,
            None => Repos::create_inmemory(config.timezone),
        };
        let index: Arc<dyn ISearchIndex> = match &config.search_index_url {
            Some(url) => {
                info!(
                    "Mirroring events into search index {} at {}",
                    config.search_index_name, url
                );
                Arc::new(ElasticSearchIndex::new(
                    url.clone(),
                    config.search_index_name.clone(),
                ))
            }
            None => Arc::new(InMemorySearchIndex::new()),
        };
        Ok(Self::new(repos, config, index))
    }

    /// Context with inmemory repositories and search index, using UTC as the event timezone
    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with_index(Arc::new(InMemorySearchIndex::new()))
    }

    pub fn create_inmemory_with_index(index: Arc<dyn ISearchIndex>) -> Self {
        let mut config = Config::new();
        config.database_url = None;
        config.search_index_url = None;
        config.timezone = chrono_tz::UTC;
        let repos = Repos::create_inmemory(config.timezone);
        Self::new(repos, config, index)
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<EventHubContext> {
    EventHubContext::create(Config::new()).await
}

pub async fn run_migration(connection_string: &str) -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await?;

    sqlx::migrate!().run(&pool).await
}
