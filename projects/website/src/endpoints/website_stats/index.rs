use axum::{
    extract::Extension,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::db::{
    global_stats::models::{GlobalStats, FALLBACK_STATS},
    store::FetchGlobalStatsError,
};
use crate::state::AppState;
use crate::utils::{
    environment::{find_env, Environment, ResolveStoreTargetError},
    response::{send_empty, send_res},
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("ResolveStoreTarget: {source}")]
    ResolveStoreTarget {
        #[from]
        source: ResolveStoreTargetError,
    },
    #[error("FetchGlobalStats: {source}")]
    FetchGlobalStats {
        #[from]
        source: FetchGlobalStatsError,
    },
    #[error("JoinBlockingTask: {source}")]
    JoinBlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

#[derive(Serialize)]
struct MethodNotAllowed {
    status: &'static str,
}

/// Axum handler: ANY /website_stats
pub async fn handler(
    Extension(state): Extension<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("{} {}", method, uri.path());

    if method == Method::OPTIONS {
        return send_empty(StatusCode::OK);
    }
    if method != Method::GET {
        error!("Method not allowed");
        // Body text is matched by existing clients, typo included.
        return send_res(
            MethodNotAllowed {
                status: "Method now allowed",
            },
            StatusCode::BAD_REQUEST,
        );
    }

    let env = find_env(&request_host(&headers, &uri));
    let date_id = today_date_id();

    match fetch_global_stats(&state, env, &date_id).await {
        Ok(Some(stats)) => send_res(stats, StatusCode::OK),
        Ok(None) => {
            warn!(%env, %date_id, "No global stats row, serving fallback");
            send_res(FALLBACK_STATS, StatusCode::OK)
        }
        Err(err) => {
            warn!(%env, %date_id, error = %err, "Global stats lookup failed, serving fallback");
            send_res(FALLBACK_STATS, StatusCode::OK)
        }
    }
}

/// UTC calendar day used as the `global_stats` key.
pub fn today_date_id() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub async fn fetch_global_stats(
    state: &AppState,
    env: Environment,
    date_id: &str,
) -> Result<Option<GlobalStats>, HandlerError> {
    let target = state.store_targets.resolve(env)?.clone();
    let stats = state.stats.clone();
    let date_id = date_id.to_string();

    let row = tokio::task::spawn_blocking(move || {
        stats.get_global_stats_by_date(&target, &date_id)
    })
    .await??;

    Ok(row)
}

fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .unwrap_or_default()
        .to_string()
}
