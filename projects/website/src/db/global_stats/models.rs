use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::global_stats;

/// Daily usage snapshot, written by the stats batch job.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = global_stats)]
#[diesel(primary_key(date_id))]
pub struct GlobalStats {
    pub date_id: String,
    pub created_at: Option<NaiveDateTime>,
    pub apps: i64,
    pub updates: i64,
    pub stars: i64,
}

/// Counters served when no row is available for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub apps: i64,
    pub updates: i64,
    pub stars: i64,
}

pub const FALLBACK_STATS: StatsSummary = StatsSummary {
    apps: 190,
    updates: 130_000,
    stars: 125,
};
