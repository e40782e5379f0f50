use axum::{
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "authorization, x-client-info, apikey, content-type",
    ),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
];

/// JSON response carrying the public CORS headers.
pub fn send_res<T: Serialize>(body: T, status: StatusCode) -> Response {
    (status, CORS_HEADERS, Json(body)).into_response()
}

/// Bodyless response carrying the public CORS headers, used for preflights.
pub fn send_empty(status: StatusCode) -> Response {
    (status, CORS_HEADERS, ()).into_response()
}
