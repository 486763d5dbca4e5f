use crate::domain::error::FleetError;
use crate::domain::model::{
    ApplyReceipt, Bus, Conductor, LoginRequest, LoginResponse, Message, OutgoingMessage,
    Recommendation, SendReceipt, StatsBundle,
};
use crate::domain::traits::CollectionSource;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

// FastAPI error body shape
#[derive(Deserialize, Debug)]
struct ErrorBody {
    detail: String,
}

#[derive(Serialize)]
struct BroadcastBody<'a> {
    message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastReceipt {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Typed client for the RouteSaathi HTTP API.
///
/// Every method is a pure read or a single mutation request; nothing here
/// touches the controller's cache.
#[derive(Clone)]
pub struct FleetApi {
    client: Client,
    base: String,
}

impl FleetApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FleetError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(FleetError::Transport)?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FleetError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(FleetError::Transport)?;
        decode_response(response).await
    }

    // ---- auth ----

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, FleetError> {
        self.post_json("/auth/login", request).await
    }

    // ---- reads ----

    pub async fn dashboard_stats(&self) -> Result<StatsBundle, FleetError> {
        self.get_json("/dashboard/stats").await
    }

    /// The backend also filters server-side through these query params;
    /// the client keeps its own view filtering, so plain reloads pass
    /// `None` for both.
    pub async fn buses(
        &self,
        route: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Bus>, FleetError> {
        let mut url = self.url("/buses");
        let mut params = Vec::new();
        if let Some(route) = route {
            params.push(("route", route));
        }
        if let Some(status) = status {
            params.push(("status", status));
        }
        if !params.is_empty() {
            let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            url = format!("{}?{}", url, query.join("&"));
        }
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FleetError::Transport)?;
        decode_response(response).await
    }

    pub async fn conductors(&self) -> Result<Vec<Conductor>, FleetError> {
        self.get_json("/communication/conductors").await
    }

    pub async fn messages(&self) -> Result<Vec<Message>, FleetError> {
        self.get_json("/communication/messages").await
    }

    pub async fn recommendations(&self) -> Result<Vec<Recommendation>, FleetError> {
        self.get_json("/ai/recommendations").await
    }

    // ---- mutations ----

    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<SendReceipt, FleetError> {
        self.post_json("/messages", message).await
    }

    pub async fn broadcast(&self, message: &str) -> Result<BroadcastReceipt, FleetError> {
        self.post_json("/broadcast", &BroadcastBody { message }).await
    }

    pub async fn apply_recommendation(&self, route_id: &str) -> Result<ApplyReceipt, FleetError> {
        let path = format!("/ai/apply/{}", route_id);
        debug!(path = %path, "POST");
        let response = self
            .client
            .post(self.url(&path))
            .send()
            .await
            .map_err(FleetError::Transport)?;
        decode_response(response).await
    }
}

#[async_trait]
impl CollectionSource<Conductor> for FleetApi {
    async fn fetch(&self) -> Result<Vec<Conductor>, FleetError> {
        self.conductors().await
    }
}

#[async_trait]
impl CollectionSource<Bus> for FleetApi {
    async fn fetch(&self) -> Result<Vec<Bus>, FleetError> {
        self.buses(None, None).await
    }
}

#[async_trait]
impl CollectionSource<Message> for FleetApi {
    async fn fetch(&self) -> Result<Vec<Message>, FleetError> {
        self.messages().await
    }
}

#[async_trait]
impl CollectionSource<Recommendation> for FleetApi {
    async fn fetch(&self) -> Result<Vec<Recommendation>, FleetError> {
        self.recommendations().await
    }
}

// Non-2xx responses carry a {"detail": ...} body; fall back to the raw
// body, then the canonical reason, when that shape is missing.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, FleetError> {
    let status = response.status();
    if !status.is_success() {
        let fallback = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        let detail = match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => err.detail,
                Err(_) if !body.trim().is_empty() => body.trim().to_string(),
                Err(_) => fallback,
            },
            Err(_) => fallback,
        };
        return Err(FleetError::server(status.as_u16(), detail));
    }

    response.json::<T>().await.map_err(FleetError::from_reqwest)
}
