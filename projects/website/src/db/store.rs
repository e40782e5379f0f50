use std::collections::HashMap;
use std::sync::Mutex;

use diesel::r2d2::{ConnectionManager, Pool};
use thiserror::Error;
use tracing::debug;

use crate::db::{
    global_stats::{
        models::GlobalStats,
        queries::{get_global_stats_by_date, GetGlobalStatsByDateError},
    },
    PgPool,
};
use crate::utils::environment::StoreTarget;

#[derive(Debug, Error)]
pub enum FetchGlobalStatsError {
    #[error("PoolRegistryPoisoned")]
    PoolRegistryPoisoned,
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error(transparent)]
    GetGlobalStatsByDate {
        #[from]
        source: GetGlobalStatsByDateError,
    },
}

/// Read side of the `global_stats` table. Calls block.
pub trait GlobalStatsSource: Send + Sync {
    fn get_global_stats_by_date(
        &self,
        target: &StoreTarget,
        date_id: &str,
    ) -> Result<Option<GlobalStats>, FetchGlobalStatsError>;
}

/// Postgres-backed source holding one lazily built pool per connection URL.
pub struct PgStatsStore {
    pools: Mutex<HashMap<String, PgPool>>,
    pool_size: u32,
}

impl PgStatsStore {
    pub fn new(pool_size: u32) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            pool_size,
        }
    }

    fn pool_for(&self, target: &StoreTarget) -> Result<PgPool, FetchGlobalStatsError> {
        let mut pools = self
            .pools
            .lock()
            .map_err(|_| FetchGlobalStatsError::PoolRegistryPoisoned)?;

        let pool = pools.entry(target.connection_url()).or_insert_with_key(|url| {
            debug!(database_url = %target.database_url, "Creating connection pool");
            // Unchecked: connection failures surface per request, not here.
            Pool::builder()
                .max_size(self.pool_size)
                .min_idle(Some(0))
                .build_unchecked(ConnectionManager::new(url.as_str()))
        });

        Ok(pool.clone())
    }
}

impl GlobalStatsSource for PgStatsStore {
    fn get_global_stats_by_date(
        &self,
        target: &StoreTarget,
        date_id: &str,
    ) -> Result<Option<GlobalStats>, FetchGlobalStatsError> {
        let mut conn = self.pool_for(target)?.get()?;
        Ok(get_global_stats_by_date(&mut conn, date_id)?)
    }
}
