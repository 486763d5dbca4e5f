use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Network unreachable: {0}")]
    Transport(reqwest::Error),

    #[error("Server error {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl FleetError {
    /// Classify a reqwest failure: decode failures are payload problems,
    /// everything else is transport.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FleetError::MalformedPayload(err.to_string())
        } else {
            FleetError::Transport(err)
        }
    }

    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        FleetError::Server {
            status,
            detail: detail.into(),
        }
    }
}
