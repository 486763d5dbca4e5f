// HTTP client utilities
use crate::domain::error::FleetError;
use reqwest::Client;
use std::time::Duration;

/// Create the shared HTTP client with pooling and a request timeout.
pub fn create_client(timeout_secs: u64) -> Result<Client, FleetError> {
    Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("saathi/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FleetError::Transport)
}
