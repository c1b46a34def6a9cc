use crate::application::VoteService;
use crate::config::AppConfig;
use crate::infrastructure::db;
use crate::infrastructure::memory::{demo_items, MemoryLedger};
use crate::infrastructure::security::RateLimiter;
use social_office_errors::AppError;
use std::net::IpAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub votes: Arc<VoteService>,
    pub rate_limiter: RateLimiter,
    pub new_voter_limiter: RateLimiter<IpAddr>,
}

impl AppContext {
    pub fn new_memory(config: &AppConfig) -> Self {
        let ledger = if config.seed_demo_data {
            let items = demo_items();
            tracing::info!("Seeding {} demo items", items.len());
            MemoryLedger::with_items(items)
        } else {
            MemoryLedger::new()
        };

        Self {
            votes: Arc::new(VoteService::new_memory(ledger)),
            rate_limiter: RateLimiter::new(config.vote_limits),
            new_voter_limiter: RateLimiter::new(config.new_voter_limits),
        }
    }

    pub async fn new_database(config: &AppConfig, database_url: &str) -> Result<Self, AppError> {
        let conn = db::create_connection(database_url)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        db::run_migrations(&conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if config.seed_demo_data {
            tracing::warn!("SEED_DEMO_DATA is ignored with a database backend");
        }

        Ok(Self {
            votes: Arc::new(VoteService::new_database(conn)),
            rate_limiter: RateLimiter::new(config.vote_limits),
            new_voter_limiter: RateLimiter::new(config.new_voter_limits),
        })
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let ctx = match &config.database_url {
            Some(url) => Self::new_database(config, url).await?,
            None => Self::new_memory(config),
        };
        tracing::info!("Using {} vote ledger backend", ctx.votes.backend_name());
        Ok(ctx)
    }
}
