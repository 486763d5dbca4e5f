use crate::domain::error::FleetError;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::client::FleetApi;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::session::SqliteSessionStore;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub api: FleetApi,
    pub config: Arc<RwLock<Config>>,
    pub sessions: Arc<SqliteSessionStore>,
}

impl AppState {
    pub fn new(sessions: SqliteSessionStore, config: Config) -> Result<Self, FleetError> {
        let http_client = create_client(config.timeout_secs)?;
        let api = FleetApi::new(http_client, &config.base_url);

        Ok(Self {
            api,
            config: Arc::new(RwLock::new(config)),
            sessions: Arc::new(sessions),
        })
    }
}
