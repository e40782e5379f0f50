//! Website API service
//!
//! - `GET /website_stats`: today's usage counters from Postgres, with a fixed fallback
//! - `GET /api/blogs`: published blog documents from the content directory, newest first
//! - Store URL and admin key are picked per request from the requesting host

pub mod config;
pub mod db;
pub mod endpoints;
pub mod state;
pub mod utils;

pub use endpoints::router;
pub use state::AppState;
