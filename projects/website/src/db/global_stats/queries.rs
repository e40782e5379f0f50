use diesel::prelude::*;
use thiserror::Error;

use crate::db::{global_stats::models::*, schema::global_stats::dsl::*};

#[derive(Debug, Error)]
pub enum GetGlobalStatsByDateError {
    #[error("GetGlobalStatsByDate: {source}")]
    GetGlobalStatsByDate {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_global_stats_by_date(
    conn: &mut PgConnection,
    date_id_val: &str,
) -> Result<Option<GlobalStats>, GetGlobalStatsByDateError> {
    global_stats
        .filter(date_id.eq(date_id_val))
        .first::<GlobalStats>(conn)
        .optional()
        .map_err(|source| GetGlobalStatsByDateError::GetGlobalStatsByDate { source })
}
