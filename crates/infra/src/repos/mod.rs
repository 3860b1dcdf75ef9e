mod event;
mod notification;
mod shared;

use chrono_tz::Tz;
pub use event::IEventRepo;
use event::{InMemoryEventRepo, PostgresEventRepo};
pub use notification::INotificationRepo;
use notification::{InMemoryNotificationRepo, PostgresNotificationRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub notifications: Arc<dyn INotificationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str, timezone: Tz) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone(), timezone)),
            notifications: Arc::new(PostgresNotificationRepo::new(pool)),
        })
    }

    pub fn create_inmemory(timezone: Tz) -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new(timezone)),
            notifications: Arc::new(InMemoryNotificationRepo::new()),
        }
    }
}
