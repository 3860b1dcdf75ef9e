use chrono_tz::Tz;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. Without it the application runs on
    /// inmemory repositories which is only useful for testing.
    pub database_url: Option<String>,
    /// Base url of the search index that mirrors events, e.g. `http://localhost:9200`.
    /// `None` keeps the mirror in memory.
    pub search_index_url: Option<String>,
    /// Name of the index the event documents are stored in
    pub search_index_name: String,
    /// Number of workers pushing event documents to the search index
    pub search_index_workers: usize,
    /// Maximum number of event documents waiting to be pushed to the search index.
    /// Syncs issued when the queue is full are dropped and repaired by the next reindex.
    pub search_index_queue_capacity: usize,
    /// The reference timezone in which event dates and times of day are given
    pub timezone: Tz,
    /// How often upcoming events are checked for reminders to send
    pub reminder_job_interval: Duration,
    /// How often ended events are marked as completed
    pub status_job_interval: Duration,
    /// How often every event is pushed to the search index again
    pub reindex_job_interval: Duration,
    /// How far ahead of now the reminder job looks for events
    pub reminder_lookahead: chrono::Duration,
    /// Start the reminder job on a whole minute
    pub align_jobs_to_minute: bool,
}

fn parse_env_or<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or("PORT", 5000);

        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            warn!("Did not find DATABASE_URL environment variable. Going to use inmemory repositories.");
        }

        let search_index_url = match std::env::var("SEARCH_INDEX_URL") {
            Ok(url) if url.is_empty() => {
                info!("SEARCH_INDEX_URL is empty, events will only be mirrored in memory.");
                None
            }
            Ok(url) => Some(url),
            Err(_) => Some("http://localhost:9200".into()),
        };
        let search_index_name =
            std::env::var("SEARCH_INDEX_NAME").unwrap_or_else(|_| "events".into());

        let timezone = parse_env_or("EVENT_TIMEZONE", chrono_tz::UTC);
        let reindex_interval_secs = parse_env_or("SEARCH_INDEX_REINDEX_INTERVAL_SECS", 60u64);

        Self {
            port,
            database_url,
            search_index_url,
            search_index_name,
            search_index_workers: parse_env_or("SEARCH_INDEX_WORKERS", 4),
            search_index_queue_capacity: parse_env_or("SEARCH_INDEX_QUEUE_CAPACITY", 1024),
            timezone,
            reminder_job_interval: Duration::from_secs(60),
            status_job_interval: Duration::from_secs(60),
            reindex_job_interval: Duration::from_secs(reindex_interval_secs.max(1)),
            reminder_lookahead: chrono::Duration::hours(48),
            align_jobs_to_minute: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
