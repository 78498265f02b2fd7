use axum::extract::FromRef;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::LoginThrottle;
use crate::config::Config;
use crate::db::DbPool;
use crate::uploads::UploadStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
    pub throttle: Arc<LoginThrottle>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let uploads = UploadStore::with_root(
            PathBuf::from(&config.upload_dir),
            config.upload_url_prefix(),
            config.optimize_uploads,
        );
        Self {
            pool: Arc::new(pool),
            config: Arc::new(config),
            throttle: Arc::new(LoginThrottle::default()),
            uploads: Arc::new(uploads),
        }
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
