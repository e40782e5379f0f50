use std::sync::Arc;

use interfaces_content_query::ContentStore;

use crate::db::store::GlobalStatsSource;
use crate::utils::environment::StoreTargets;

/// Shared by every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<dyn GlobalStatsSource>,
    pub store_targets: Arc<StoreTargets>,
    pub content: ContentStore,
}

impl AppState {
    pub fn new(
        stats: Arc<dyn GlobalStatsSource>,
        store_targets: StoreTargets,
        content: ContentStore,
    ) -> Self {
        Self {
            stats,
            store_targets: Arc::new(store_targets),
            content,
        }
    }
}
