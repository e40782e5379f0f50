use axum::{
    extract::{Extension, Json},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use interfaces_content_query::{ContentStore, Direction, Document, FindContentError};
use serde_json::Map;
use thiserror::Error;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("FindContent: {source}")]
    FindContent {
        #[from]
        source: FindContentError,
    },
    #[error("JoinBlockingTask: {source}")]
    JoinBlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!("{self}");
        // Error body is `{}` even though success is an array.
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Map::new())).into_response()
    }
}

/// Axum handler: GET /api/blogs
pub async fn handler(
    Extension(state): Extension<AppState>,
    uri: Uri,
) -> Result<Json<Vec<Document>>, HandlerError> {
    info!("GET {}", uri.path());

    let blogs = list_published_blogs(state.content.clone()).await?;
    Ok(Json(blogs))
}

/// Published documents, newest `created_at` first.
pub async fn list_published_blogs(content: ContentStore) -> Result<Vec<Document>, HandlerError> {
    let blogs = tokio::task::spawn_blocking(move || {
        content
            .query()
            .where_eq("published", true)
            .sort("created_at", Direction::Descending)
            .find()
    })
    .await??;

    Ok(blogs)
}
