use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::ezygo::{AttendanceApi, EzygoClient};
use crate::preferences::Preferences;
use crate::session::SessionStore;
use crate::storage::LocalStore;

/// Everything a front end needs, wired over one shared local store.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<LocalStore>,
    pub session: SessionStore,
    pub preferences: Preferences,
    pub api: Arc<dyn AttendanceApi>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = Arc::new(LocalStore::open(config.state_path.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<LocalStore>) -> Result<Self, AppError> {
        let session = SessionStore::new(Arc::clone(&store));
        let preferences = Preferences::new(Arc::clone(&store));
        let api: Arc<dyn AttendanceApi> =
            Arc::new(EzygoClient::new(config.clone(), session.clone())?);
        Ok(Self {
            config,
            store,
            session,
            preferences,
            api,
        })
    }
}
