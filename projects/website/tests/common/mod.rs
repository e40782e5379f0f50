#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use diesel::result::Error as DieselError;
use interfaces_content_query::ContentStore;
use projects_website::{
    db::{
        global_stats::{models::GlobalStats, queries::GetGlobalStatsByDateError},
        store::{FetchGlobalStatsError, GlobalStatsSource},
    },
    router,
    utils::environment::{Environment, StoreTarget, StoreTargets},
    AppState,
};

/// In-memory `global_stats` with an optional forced failure.
#[derive(Default)]
pub struct FakeStats {
    pub rows: Vec<GlobalStats>,
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl GlobalStatsSource for FakeStats {
    fn get_global_stats_by_date(
        &self,
        target: &StoreTarget,
        date_id: &str,
    ) -> Result<Option<GlobalStats>, FetchGlobalStatsError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.connection_url(), date_id.to_string()));

        if self.fail {
            return Err(FetchGlobalStatsError::GetGlobalStatsByDate {
                source: GetGlobalStatsByDateError::GetGlobalStatsByDate {
                    source: DieselError::BrokenTransactionManager,
                },
            });
        }
        Ok(self.rows.iter().find(|row| row.date_id == date_id).cloned())
    }
}

pub fn local_targets() -> StoreTargets {
    let mut targets = StoreTargets::default();
    targets.insert(
        Environment::Local,
        StoreTarget {
            database_url: "postgres://localhost/postgres".to_string(),
            admin_key: Some("local-key".to_string()),
        },
    );
    targets
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn(stats: Arc<FakeStats>, targets: StoreTargets, content_dir: &Path) -> TestServer {
    let state = AppState::new(stats, targets, ContentStore::open(content_dir));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    TestServer {
        addr,
        client: reqwest::Client::new(),
    }
}
